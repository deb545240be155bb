use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use zipcast::{
    ForecastError, ForecastService, NominatimResolver, OwmClient, PersistentCache, Provenance,
    ZipcastConfig,
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let address: String = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if address.trim().is_empty() {
        eprintln!("usage: zipcast <address>");
        return Ok(ExitCode::from(2));
    }

    let config = ZipcastConfig::load("config/default")?;

    let resolver = NominatimResolver::new(&config.geocoder)?;
    let provider = OwmClient::new(&config.weather)?;
    let cache = PersistentCache::new(&config.cache.location)?;

    let service = ForecastService::new(Arc::new(resolver), Arc::new(provider), Arc::new(cache))
        .with_ttl(Duration::from_secs(config.cache.ttl_seconds));

    match service.fetch_forecast(&address).await {
        Ok(result) => {
            let snapshot = result.snapshot();
            let source = match result.provenance() {
                Provenance::Fresh => "fresh",
                Provenance::Cached => "cached",
            };

            println!("{}", result.location().formatted_address);
            println!(
                "Now: {}°F ({}), low {}°F, high {}°F [{source}]",
                snapshot.current_temp, snapshot.description, snapshot.temp_min, snapshot.temp_max
            );
            for day in &snapshot.daily {
                println!(
                    "  {}: {:.1}°F to {:.1}°F, {}",
                    day.date, day.temp_min, day.temp_max, day.description
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", err.user_message());
            let code = match err {
                ForecastError::AddressNotFound { .. } => 1,
                ForecastError::UpstreamUnavailable { .. } => 3,
            };
            Ok(ExitCode::from(code))
        }
    }
}
