//! Configuration management for the `zipcast` application
//!
//! Loads settings from an optional TOML file layered with
//! `ZIPCAST_`-prefixed environment variables, and validates them before the
//! clients are built.

use anyhow::{Context, Result, bail};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZipcastConfig {
    /// Geocoder (address resolver) settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    /// Weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Geocoder client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Base URL of the Nominatim instance
    #[serde(default = "default_geocoder_base_url")]
    pub base_url: String,
    /// User agent sent with every request (required by Nominatim's policy)
    #[serde(default = "default_geocoder_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Weather API client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    #[serde(default)]
    pub api_key: String,
    /// Base URL for the weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Forecast freshness window in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
    /// Cache database directory
    #[serde(default = "default_cache_location")]
    pub location: String,
}

// Default value functions
fn default_geocoder_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_geocoder_user_agent() -> String {
    format!("zipcast/{}", env!("CARGO_PKG_VERSION"))
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_cache_ttl() -> u64 {
    30 * 60
}

fn default_cache_location() -> String {
    ".zipcast-cache".to_string()
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_base_url(),
            user_agent: default_geocoder_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_weather_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
            location: default_cache_location(),
        }
    }
}

impl Default for ZipcastConfig {
    fn default() -> Self {
        Self {
            geocoder: GeocoderConfig::default(),
            weather: WeatherConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl ZipcastConfig {
    /// Load configuration from the given file (if it exists) layered with
    /// `ZIPCAST_`-prefixed environment variables
    /// (e.g. `ZIPCAST_WEATHER__API_KEY`).
    pub fn load(config_path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix("ZIPCAST").separator("__"))
            .build()
            .with_context(|| format!("Failed to load configuration from {config_path}"))?;

        let config: ZipcastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate settings that would otherwise fail at request time.
    pub fn validate(&self) -> Result<()> {
        if self.weather.api_key.trim().is_empty() {
            bail!("weather.api_key is required (set ZIPCAST_WEATHER__API_KEY)");
        }
        if self.geocoder.timeout_seconds == 0 || self.weather.timeout_seconds == 0 {
            bail!("timeouts must be greater than zero");
        }
        if self.cache.ttl_seconds == 0 {
            bail!("cache.ttl_seconds must be greater than zero");
        }
        Ok(())
    }
}
