//! HTTP adapters for the resolver and weather-provider capabilities
//!
//! Thin, replaceable clients: Nominatim for geocoding free-text addresses
//! and OpenWeatherMap for current conditions plus the 3-hourly forecast
//! feed. Everything behind the capability traits; transport failures surface
//! as the collaborator error newtypes and never leak further.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::{GeocoderConfig, WeatherConfig};
use crate::models::Location;
use crate::provider::{CurrentConditions, FeedPoint, ProviderError, WeatherProvider};
use crate::resolver::{AddressResolver, Granularity, Resolution, ResolverError};

/// Geocoding client for the Nominatim search API.
pub struct NominatimResolver {
    client: Client,
    base_url: String,
}

impl NominatimResolver {
    /// Create a new resolver. Nominatim's usage policy requires an
    /// identifying user agent.
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.clone())
            .build()
            .with_context(|| "Failed to create geocoder HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl AddressResolver for NominatimResolver {
    #[instrument(skip(self))]
    async fn resolve(&self, text: &str) -> Result<Resolution, ResolverError> {
        let url = format!(
            "{}/search?q={}&format=jsonv2&addressdetails=1&limit=1",
            self.base_url,
            urlencoding::encode(text)
        );
        debug!(%url, "geocoder request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ResolverError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolverError(format!("geocoder returned HTTP {status}")));
        }

        let places: Vec<nominatim::Place> = response
            .json()
            .await
            .map_err(|e| ResolverError(format!("invalid geocoder response: {e}")))?;

        resolution_from_places(places)
    }
}

/// Map a geocoder result list to a resolution, rejecting matches too coarse
/// to forecast for. An empty list and a state/country match are both
/// `NotFound`; a malformed payload is a transport-level failure.
fn resolution_from_places(places: Vec<nominatim::Place>) -> Result<Resolution, ResolverError> {
    let Some(place) = places.into_iter().next() else {
        return Ok(Resolution::NotFound);
    };

    let granularity = granularity_from_addresstype(&place.addresstype);
    if granularity.is_too_coarse() {
        debug!(
            addresstype = %place.addresstype,
            "rejecting overly coarse geocoder match"
        );
        return Ok(Resolution::NotFound);
    }

    let latitude: f64 = place
        .lat
        .parse()
        .map_err(|_| ResolverError(format!("malformed latitude {:?}", place.lat)))?;
    let longitude: f64 = place
        .lon
        .parse()
        .map_err(|_| ResolverError(format!("malformed longitude {:?}", place.lon)))?;
    let postal_code = place.address.and_then(|a| a.postcode);

    Ok(Resolution::Found(Location::new(
        latitude,
        longitude,
        postal_code,
        place.display_name,
    )))
}

fn granularity_from_addresstype(addresstype: &str) -> Granularity {
    match addresstype {
        "country" => Granularity::Country,
        "state" | "province" | "region" => Granularity::State,
        "county" | "state_district" => Granularity::County,
        "city" | "town" | "village" | "municipality" | "hamlet" | "suburb" | "locality" => {
            Granularity::City
        }
        "postcode" => Granularity::Postcode,
        "road" | "street" => Granularity::Street,
        _ => Granularity::Building,
    }
}

/// Weather client for the OpenWeatherMap 2.5 API, imperial units.
pub struct OwmClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OwmClient {
    /// Create a new weather API client
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("zipcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create weather HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        lat: f64,
        lon: f64,
    ) -> Result<T, ProviderError> {
        let url = format!(
            "{}/{endpoint}?lat={lat}&lon={lon}&units=imperial&appid={}",
            self.base_url, self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError(format!(
                "weather API returned HTTP {status} for {endpoint}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError(format!("invalid weather response: {e}")))
    }
}

#[async_trait]
impl WeatherProvider for OwmClient {
    #[instrument(skip(self))]
    async fn current_conditions(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentConditions, ProviderError> {
        let current: owm::CurrentResponse = self.fetch_json("weather", lat, lon).await?;
        let (description, icon) = owm::primary_condition(&current.weather);

        Ok(CurrentConditions {
            temp: current.main.temp,
            temp_min: current.main.temp_min,
            temp_max: current.main.temp_max,
            description,
            icon,
        })
    }

    #[instrument(skip(self))]
    async fn forecast_feed(&self, lat: f64, lon: f64) -> Result<Vec<FeedPoint>, ProviderError> {
        let forecast: owm::ForecastResponse = self.fetch_json("forecast", lat, lon).await?;
        debug!(points = forecast.list.len(), "received forecast feed");

        forecast
            .list
            .into_iter()
            .map(|entry| {
                let timestamp = DateTime::from_timestamp(entry.dt, 0)
                    .ok_or_else(|| {
                        ProviderError(format!("feed timestamp {} out of range", entry.dt))
                    })?
                    .naive_utc();
                let (description, icon) = owm::primary_condition(&entry.weather);

                Ok(FeedPoint {
                    timestamp,
                    temp_min: entry.main.temp_min,
                    temp_max: entry.main.temp_max,
                    description,
                    icon,
                })
            })
            .collect()
    }
}

/// Nominatim response shapes (jsonv2 format).
mod nominatim {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct Place {
        pub lat: String,
        pub lon: String,
        pub display_name: String,
        #[serde(default)]
        pub addresstype: String,
        pub address: Option<AddressDetails>,
    }

    #[derive(Debug, Deserialize)]
    pub struct AddressDetails {
        pub postcode: Option<String>,
    }
}

/// OpenWeatherMap response shapes shared by the current-conditions and
/// forecast endpoints.
mod owm {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub main: CurrentReadings,
        #[serde(default)]
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub list: Vec<FeedEntry>,
    }

    #[derive(Debug, Deserialize)]
    pub struct FeedEntry {
        pub dt: i64,
        pub main: FeedReadings,
        #[serde(default)]
        pub weather: Vec<Condition>,
    }

    /// Current-conditions readings. All three temperatures are required: a
    /// payload without them is malformed, not a zero-degree day.
    #[derive(Debug, Deserialize)]
    pub struct CurrentReadings {
        pub temp: f64,
        pub temp_min: f64,
        pub temp_max: f64,
    }

    /// Feed-point readings; the feed only contributes per-day min/max.
    #[derive(Debug, Deserialize)]
    pub struct FeedReadings {
        pub temp_min: f64,
        pub temp_max: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
        pub icon: String,
    }

    /// Description and icon from the leading condition entry, empty when the
    /// API omits the array.
    pub fn primary_condition(conditions: &[Condition]) -> (String, String) {
        conditions
            .first()
            .map(|c| (c.description.clone(), c.icon.clone()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::models::Location;

    fn parse_places(json: &str) -> Vec<nominatim::Place> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_resolution_from_full_match() {
        let places = parse_places(
            r#"[{
                "lat": "35.2270869",
                "lon": "-80.8431268",
                "display_name": "Charlotte, Mecklenburg County, North Carolina, 28202, United States",
                "addresstype": "city",
                "address": {"postcode": "28202"}
            }]"#,
        );

        let resolution = resolution_from_places(places).unwrap();
        let expected = Location::new(
            35.2270869,
            -80.8431268,
            Some("28202".to_string()),
            "Charlotte, Mecklenburg County, North Carolina, 28202, United States".to_string(),
        );
        assert_eq!(resolution, Resolution::Found(expected));
    }

    #[test]
    fn test_empty_result_set_is_not_found() {
        let resolution = resolution_from_places(vec![]).unwrap();
        assert_eq!(resolution, Resolution::NotFound);
    }

    #[rstest]
    #[case("state")]
    #[case("country")]
    fn test_coarse_match_is_not_found(#[case] addresstype: &str) {
        let places = parse_places(&format!(
            r#"[{{
                "lat": "35.6",
                "lon": "-79.0",
                "display_name": "North Carolina, United States",
                "addresstype": "{addresstype}"
            }}]"#,
        ));

        let resolution = resolution_from_places(places).unwrap();
        assert_eq!(resolution, Resolution::NotFound);
    }

    #[test]
    fn test_missing_postcode_becomes_none() {
        let places = parse_places(
            r#"[{
                "lat": "48.85",
                "lon": "2.35",
                "display_name": "Somewhere remote",
                "addresstype": "hamlet",
                "address": {}
            }]"#,
        );

        match resolution_from_places(places).unwrap() {
            Resolution::Found(location) => assert_eq!(location.postal_code, None),
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_coordinates_are_a_resolver_error() {
        let places = parse_places(
            r#"[{
                "lat": "not-a-number",
                "lon": "2.35",
                "display_name": "Broken",
                "addresstype": "city"
            }]"#,
        );

        assert!(resolution_from_places(places).is_err());
    }

    #[test]
    fn test_owm_current_response_parses() {
        let json = r#"{
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 72.5, "feels_like": 71.0, "temp_min": 65.4, "temp_max": 79.5, "pressure": 1018, "humidity": 40}
        }"#;

        let current: owm::CurrentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(current.main.temp, 72.5);
        let (description, icon) = owm::primary_condition(&current.weather);
        assert_eq!(description, "clear sky");
        assert_eq!(icon, "01d");
    }

    #[test]
    fn test_owm_current_response_requires_temp() {
        // A payload without the current temperature is malformed and must
        // fail parsing rather than default to zero degrees.
        let json = r#"{
            "weather": [{"description": "clear sky", "icon": "01d"}],
            "main": {"temp_min": 65.4, "temp_max": 79.5}
        }"#;

        assert!(serde_json::from_str::<owm::CurrentResponse>(json).is_err());
    }

    #[test]
    fn test_owm_forecast_response_parses() {
        let json = r#"{
            "cnt": 2,
            "list": [
                {"dt": 1736121600, "main": {"temp": 61.0, "temp_min": 60.0, "temp_max": 75.0}, "weather": [{"description": "light rain", "icon": "10d"}]},
                {"dt": 1736132400, "main": {"temp": 63.0, "temp_min": 62.0, "temp_max": 78.0}, "weather": []}
            ]
        }"#;

        let forecast: owm::ForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(forecast.list.len(), 2);
        assert_eq!(forecast.list[0].main.temp_min, 60.0);
        // A missing weather array degrades to empty description/icon.
        let (description, icon) = owm::primary_condition(&forecast.list[1].weather);
        assert!(description.is_empty());
        assert!(icon.is_empty());
    }
}
