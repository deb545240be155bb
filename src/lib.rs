//! `zipcast` - Address-to-forecast lookup with a time-bounded weather cache
//!
//! This library resolves a free-text address into current weather conditions
//! plus a five-day daily outlook, caching results under a postal-code-derived
//! key so repeated queries for the same area skip the upstream provider.

pub mod aggregate;
pub mod api;
pub mod cache;
pub mod cache_key;
pub mod config;
pub mod error;
pub mod forecast;
pub mod models;
pub mod provider;
pub mod resolver;

// Re-export core types for public API
pub use api::{NominatimResolver, OwmClient};
pub use cache::{ForecastCache, MemoryCache, PersistentCache};
pub use cache_key::forecast_key;
pub use config::ZipcastConfig;
pub use error::ForecastError;
pub use forecast::{FORECAST_TTL, ForecastService};
pub use models::{DailyForecast, ForecastResult, Location, Provenance, WeatherSnapshot};
pub use provider::{CurrentConditions, FeedPoint, WeatherProvider};
pub use resolver::{AddressResolver, Granularity, Resolution};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
