//! Address resolver capability contract
//!
//! The orchestrator depends on this trait rather than a concrete geocoder;
//! tests supply stub implementations and `api::NominatimResolver` is the
//! production one.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Location;

/// Transport or service failure while talking to the geocoder.
#[derive(Error, Debug)]
#[error("address resolver unavailable: {0}")]
pub struct ResolverError(pub String);

/// Administrative level of a geocoder match. Used to reject matches too
/// coarse to forecast for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Building,
    Street,
    Postcode,
    City,
    County,
    State,
    Country,
}

impl Granularity {
    /// State- and country-level matches carry no usable point location.
    #[must_use]
    pub fn is_too_coarse(self) -> bool {
        matches!(self, Self::State | Self::Country)
    }
}

/// Outcome of a resolution attempt. "No usable match" is an explicit value,
/// not an error, so callers can statically tell it apart from a transport
/// failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(Location),
    NotFound,
}

/// Turns free-text input into a geocoded [`Location`].
///
/// Implementations must map country/state-granularity matches to
/// [`Resolution::NotFound`] before returning.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, text: &str) -> Result<Resolution, ResolverError>;
}
