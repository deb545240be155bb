//! Daily aggregation of the raw forecast feed
//!
//! Collapses the provider's 3-hourly feed into at most five per-day
//! summaries: minimum of the day's minima, maximum of the day's maxima, and
//! the description/icon of the day's first point in feed order.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::DailyForecast;
use crate::provider::FeedPoint;

/// Maximum number of daily summaries emitted per feed.
pub const MAX_DAILY_ENTRIES: usize = 5;

/// Aggregate a raw feed into daily summaries, ascending by date, capped at
/// [`MAX_DAILY_ENTRIES`]. An empty feed yields an empty vec, not an error.
#[must_use]
pub fn aggregate_daily(feed: &[FeedPoint]) -> Vec<DailyForecast> {
    // BTreeMap keeps dates sorted; the first feed point to hit a date wins
    // the description/icon tie-break.
    let mut days: BTreeMap<NaiveDate, DailyForecast> = BTreeMap::new();

    for point in feed {
        let date = point.timestamp.date();
        days.entry(date)
            .and_modify(|day| {
                day.temp_min = day.temp_min.min(point.temp_min);
                day.temp_max = day.temp_max.max(point.temp_max);
            })
            .or_insert_with(|| DailyForecast {
                date,
                temp_min: point.temp_min,
                temp_max: point.temp_max,
                description: point.description.clone(),
                icon: point.icon.clone(),
            });
    }

    debug!(
        points = feed.len(),
        days = days.len(),
        "aggregated forecast feed"
    );

    days.into_values().take(MAX_DAILY_ENTRIES).collect()
}
