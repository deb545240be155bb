//! Weather snapshot and daily forecast models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's aggregated outlook derived from the raw forecast feed.
///
/// `temp_min`/`temp_max` stay as the provider's unrounded per-day aggregates;
/// only the top-level snapshot carries display-rounded values.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecast {
    /// Calendar date this entry summarizes (ISO 8601 in serialized form)
    pub date: NaiveDate,
    /// Minimum over the day's feed points, in Fahrenheit
    pub temp_min: f64,
    /// Maximum over the day's feed points, in Fahrenheit
    pub temp_max: f64,
    /// Conditions description from the day's first feed point
    pub description: String,
    /// Icon code from the day's first feed point
    pub icon: String,
}

/// Current conditions plus the daily outlook, in display form.
///
/// Temperatures are rounded half-up to whole degrees exactly once, at
/// construction. Nothing downstream rounds again.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Current temperature in whole degrees Fahrenheit
    pub current_temp: i32,
    /// Today's low in whole degrees Fahrenheit
    pub temp_min: i32,
    /// Today's high in whole degrees Fahrenheit
    pub temp_max: i32,
    /// Human-readable conditions description
    pub description: String,
    /// Provider icon code
    pub icon: String,
    /// Up to five daily summaries, ascending by date
    pub daily: Vec<DailyForecast>,
}

impl WeatherSnapshot {
    /// Build a snapshot from the provider's raw floating-point readings,
    /// applying the one-time display rounding.
    #[must_use]
    pub fn from_observations(
        temp: f64,
        temp_min: f64,
        temp_max: f64,
        description: String,
        icon: String,
        daily: Vec<DailyForecast>,
    ) -> Self {
        Self {
            current_temp: round_half_up(temp),
            temp_min: round_half_up(temp_min),
            temp_max: round_half_up(temp_max),
            description,
            icon,
            daily,
        }
    }
}

/// Round to the nearest whole degree, with halves always rounding up
/// (72.5 -> 73, -2.5 -> -2).
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
