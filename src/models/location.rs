//! Resolved location model

use serde::{Deserialize, Serialize};

/// Sentinel some geocoders emit in place of a missing postal code.
const UNKNOWN_POSTAL_CODE: &str = "UNKNOWN";

/// A geocoded location, produced once per request by the address resolver.
///
/// Immutable after construction; fields are read-only outside this module's
/// constructors and there are no mutators.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Postal code, when the resolver could determine one
    pub postal_code: Option<String>,
    /// Full formatted address as returned by the resolver
    pub formatted_address: String,
}

impl Location {
    /// Create a new location. An empty or `"UNKNOWN"` postal code is
    /// normalized to `None` so key derivation sees a single missing state.
    #[must_use]
    pub fn new(
        latitude: f64,
        longitude: f64,
        postal_code: Option<String>,
        formatted_address: String,
    ) -> Self {
        let postal_code = postal_code
            .filter(|code| !code.trim().is_empty() && code != UNKNOWN_POSTAL_CODE);
        Self {
            latitude,
            longitude,
            postal_code,
            formatted_address,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postal_code_normalization() {
        let with_zip = Location::new(35.22, -80.84, Some("28202".to_string()), "Charlotte, NC".to_string());
        assert_eq!(with_zip.postal_code.as_deref(), Some("28202"));

        let sentinel = Location::new(35.22, -80.84, Some("UNKNOWN".to_string()), "Charlotte, NC".to_string());
        assert_eq!(sentinel.postal_code, None);

        let blank = Location::new(35.22, -80.84, Some("  ".to_string()), "Charlotte, NC".to_string());
        assert_eq!(blank.postal_code, None);

        let missing = Location::new(35.22, -80.84, None, "Charlotte, NC".to_string());
        assert_eq!(missing.postal_code, None);
    }

    #[test]
    fn test_format_coordinates() {
        let location = Location::new(35.227_085, -80.843_124, None, "Charlotte".to_string());
        assert_eq!(location.format_coordinates(), "35.2271, -80.8431");
    }
}
