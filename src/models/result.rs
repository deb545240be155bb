//! Forecast result and its cache wire form

use serde::{Deserialize, Serialize};

use super::{Location, WeatherSnapshot};

/// Whether a result was freshly computed or rehydrated from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Fresh,
    Cached,
}

/// A complete answer to one forecast query.
///
/// Provenance is fixed at construction: `fresh` tags a result built from a
/// live provider call, `from_cache_payload` always tags `Cached`. There is no
/// way to change it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    location: Location,
    snapshot: WeatherSnapshot,
    provenance: Provenance,
}

/// Cache wire payload. Provenance is deliberately absent: rehydration always
/// produces a `Cached` result, so storing the tag would only invite drift.
#[derive(Serialize, Deserialize)]
struct CacheEntry {
    location: Location,
    snapshot: WeatherSnapshot,
}

impl ForecastResult {
    /// Tag a result built from a live upstream fetch
    #[must_use]
    pub fn fresh(location: Location, snapshot: WeatherSnapshot) -> Self {
        Self {
            location,
            snapshot,
            provenance: Provenance::Fresh,
        }
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub fn snapshot(&self) -> &WeatherSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Serialize to the JSON cache payload (location + snapshot only).
    pub fn to_cache_payload(&self) -> Result<String, serde_json::Error> {
        let entry = CacheEntry {
            location: self.location.clone(),
            snapshot: self.snapshot.clone(),
        };
        serde_json::to_string(&entry)
    }

    /// Rehydrate from a cache payload. The result is always `Cached`.
    pub fn from_cache_payload(payload: &str) -> Result<Self, serde_json::Error> {
        let entry: CacheEntry = serde_json::from_str(payload)?;
        Ok(Self {
            location: entry.location,
            snapshot: entry.snapshot,
            provenance: Provenance::Cached,
        })
    }
}
