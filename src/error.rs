//! Error types and handling for the `zipcast` forecast core

use thiserror::Error;

use crate::provider::ProviderError;
use crate::resolver::ResolverError;

/// Caller-visible error taxonomy of the forecast orchestrator.
///
/// Collaborator-specific failures (geocoder transport faults, weather API
/// errors, cache backend outages) are translated at the orchestrator boundary
/// into exactly these two kinds; nothing below it propagates as-is.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// The address could not be resolved to a usable location: blank input,
    /// no geocoder match, or only a state/country-level match.
    #[error("Address not found: {message}")]
    AddressNotFound { message: String },

    /// A collaborator failed at the transport or service level. The original
    /// failure's message is preserved for diagnostics.
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable { message: String },
}

impl ForecastError {
    /// Create a new address-not-found error
    pub fn address_not_found<S: Into<String>>(message: S) -> Self {
        Self::AddressNotFound {
            message: message.into(),
        }
    }

    /// Create a new upstream-unavailable error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::AddressNotFound { message } => {
                format!("Could not find that address: {message}. Try a more specific one.")
            }
            ForecastError::UpstreamUnavailable { .. } => {
                "Weather services are currently unreachable. Please try again later.".to_string()
            }
        }
    }
}

impl From<ResolverError> for ForecastError {
    fn from(err: ResolverError) -> Self {
        Self::upstream(err.to_string())
    }
}

impl From<ProviderError> for ForecastError {
    fn from(err: ProviderError) -> Self {
        Self::upstream(err.to_string())
    }
}
