//! Forecast orchestration
//!
//! The facade over resolver, cache, and weather provider: resolve the
//! address, consult the cache, fetch and aggregate on a miss, store the
//! fresh result before returning it.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::aggregate::aggregate_daily;
use crate::cache::ForecastCache;
use crate::cache_key::forecast_key;
use crate::error::ForecastError;
use crate::models::{ForecastResult, WeatherSnapshot};
use crate::provider::WeatherProvider;
use crate::resolver::{AddressResolver, Resolution};

/// Fixed freshness window for cached forecasts.
pub const FORECAST_TTL: Duration = Duration::from_secs(30 * 60);

/// Answers one forecast query at a time. Stateless aside from the shared
/// cache; safe to call concurrently. Racing misses on the same key may both
/// fetch and both write, last write wins.
pub struct ForecastService {
    resolver: Arc<dyn AddressResolver>,
    provider: Arc<dyn WeatherProvider>,
    cache: Arc<dyn ForecastCache>,
    ttl: Duration,
}

impl ForecastService {
    /// Wire the orchestrator to its three collaborators with the default
    /// 30-minute TTL.
    #[must_use]
    pub fn new(
        resolver: Arc<dyn AddressResolver>,
        provider: Arc<dyn WeatherProvider>,
        cache: Arc<dyn ForecastCache>,
    ) -> Self {
        Self {
            resolver,
            provider,
            cache,
            ttl: FORECAST_TTL,
        }
    }

    /// Override the freshness window.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Resolve an address and return its forecast, cached or fresh.
    ///
    /// # Errors
    ///
    /// [`ForecastError::AddressNotFound`] when the input is blank or the
    /// resolver finds no usable match; [`ForecastError::UpstreamUnavailable`]
    /// when any collaborator fails at the transport or service level.
    #[instrument(skip(self))]
    pub async fn fetch_forecast(&self, address: &str) -> crate::Result<ForecastResult> {
        if address.trim().is_empty() {
            return Err(ForecastError::address_not_found("address is blank"));
        }

        let location = match self.resolver.resolve(address).await? {
            Resolution::Found(location) => location,
            Resolution::NotFound => {
                return Err(ForecastError::address_not_found(format!(
                    "no usable match for {address:?}"
                )));
            }
        };
        debug!(
            formatted = %location.formatted_address,
            coordinates = %location.format_coordinates(),
            "resolved address"
        );

        let key = forecast_key(&location);

        let cached = self
            .cache
            .get(&key)
            .await
            .map_err(|e| ForecastError::upstream(format!("cache read failed: {e}")))?;

        if let Some(payload) = cached {
            info!(%key, "cache hit");
            let result = ForecastResult::from_cache_payload(&payload).map_err(|e| {
                warn!(%key, "cache entry did not deserialize");
                ForecastError::upstream(format!("corrupt cache entry for {key}: {e}"))
            })?;
            return Ok(result);
        }

        info!(%key, "cache miss, fetching upstream");
        let current = self
            .provider
            .current_conditions(location.latitude, location.longitude)
            .await?;
        let feed = self
            .provider
            .forecast_feed(location.latitude, location.longitude)
            .await?;

        let daily = aggregate_daily(&feed);
        let snapshot = WeatherSnapshot::from_observations(
            current.temp,
            current.temp_min,
            current.temp_max,
            current.description,
            current.icon,
            daily,
        );
        let result = ForecastResult::fresh(location, snapshot);

        // Store synchronously before returning so a read inside the TTL
        // window is guaranteed to observe this entry.
        let payload = result
            .to_cache_payload()
            .map_err(|e| ForecastError::upstream(format!("could not serialize forecast: {e}")))?;
        self.cache
            .put(&key, payload, self.ttl)
            .await
            .map_err(|e| ForecastError::upstream(format!("cache write failed: {e}")))?;

        Ok(result)
    }
}
