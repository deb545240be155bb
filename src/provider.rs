//! Weather provider capability contract

use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

/// Transport or service failure while talking to the weather API.
#[derive(Error, Debug)]
#[error("weather provider unavailable: {0}")]
pub struct ProviderError(pub String);

/// Current conditions at a point, as reported by the provider.
/// Temperatures are the provider's raw Fahrenheit floats; display rounding
/// happens later, in [`crate::models::WeatherSnapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub description: String,
    pub icon: String,
}

/// One timestamped reading from the raw forecast feed (3-hour resolution).
///
/// The timestamp is kept naive: grouping into days uses its embedded date
/// component as-is, with no timezone conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPoint {
    pub timestamp: NaiveDateTime,
    pub temp_min: f64,
    pub temp_max: f64,
    pub description: String,
    pub icon: String,
}

/// Upstream weather API, abstracted so tests can count and fail calls.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions at the given coordinates.
    async fn current_conditions(&self, lat: f64, lon: f64)
    -> Result<CurrentConditions, ProviderError>;

    /// Raw multi-point forecast feed at the given coordinates, 3-hour
    /// granularity, at least five days of coverage.
    async fn forecast_feed(&self, lat: f64, lon: f64) -> Result<Vec<FeedPoint>, ProviderError>;
}
