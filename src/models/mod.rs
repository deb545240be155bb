//! Immutable value types for the forecast core

pub mod location;
pub mod result;
pub mod snapshot;

pub use location::Location;
pub use result::{ForecastResult, Provenance};
pub use snapshot::{DailyForecast, WeatherSnapshot};
