//! Cache key derivation
//!
//! Weather is locally uniform, so every address sharing a postal code maps
//! onto one cache entry. When the resolver could not determine a postal code,
//! coordinates rounded to a coarse grid give an analogous grouping without
//! colliding genuinely distant locations.

use crate::models::Location;

/// Schema version tag baked into every key. Any incompatible change to the
/// serialized payload shape must bump this rather than reuse it.
const KEY_SCHEMA_VERSION: &str = "v1";

/// Decimal places kept in the coordinate fallback grid (2 ≈ 1.1 km).
/// A tuning knob, not a protocol requirement.
const COORD_DECIMALS: usize = 2;

/// Derive the cache key for a resolved location.
#[must_use]
pub fn forecast_key(location: &Location) -> String {
    match &location.postal_code {
        Some(postal_code) => format!("forecast:{postal_code}:{KEY_SCHEMA_VERSION}"),
        None => format!(
            "forecast:lat_{lat:.prec$}_lon_{lon:.prec$}:{KEY_SCHEMA_VERSION}",
            lat = location.latitude,
            lon = location.longitude,
            prec = COORD_DECIMALS,
        ),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn location(lat: f64, lon: f64, postal_code: Option<&str>) -> Location {
        Location::new(
            lat,
            lon,
            postal_code.map(str::to_string),
            "somewhere".to_string(),
        )
    }

    #[test]
    fn test_postal_code_key_ignores_coordinates() {
        let downtown = location(35.2271, -80.8431, Some("28202"));
        let uptown = location(35.2400, -80.8300, Some("28202"));
        assert_eq!(forecast_key(&downtown), "forecast:28202:v1");
        assert_eq!(forecast_key(&downtown), forecast_key(&uptown));
    }

    #[test]
    fn test_fallback_key_uses_rounded_grid() {
        let spot = location(35.227_085, -80.843_124, None);
        assert_eq!(forecast_key(&spot), "forecast:lat_35.23_lon_-80.84:v1");
    }

    #[rstest]
    // Shifts below the grid size land in the same cell.
    #[case(35.2271, 35.2279, true)]
    // Shifts that cross a rounding boundary change the key.
    #[case(35.2271, 35.2351, false)]
    fn test_fallback_key_stability(#[case] lat_a: f64, #[case] lat_b: f64, #[case] same: bool) {
        let a = location(lat_a, -80.8431, None);
        let b = location(lat_b, -80.8431, None);
        assert_eq!(forecast_key(&a) == forecast_key(&b), same);
    }

    #[test]
    fn test_unknown_sentinel_falls_back_to_coordinates() {
        let spot = location(40.7128, -74.0060, Some("UNKNOWN"));
        assert_eq!(forecast_key(&spot), "forecast:lat_40.71_lon_-74.01:v1");
    }
}
