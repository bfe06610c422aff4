//! Reverse geocoding types

use serde::{Deserialize, Serialize};

/// Standardized reverse-geocoding result.
///
/// `lat`/`lng` echo the coordinates that were asked for, not the
/// provider's snapped location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReverseGeocodeResult {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
    #[serde(default)]
    pub address_line_1: String,
    #[serde(default)]
    pub city: String,
    /// Short state code, e.g. "CA".
    #[serde(default)]
    pub state: String,
    /// Full state name, e.g. "California".
    #[serde(default)]
    pub state_full: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default)]
    pub country_code: String,
    pub backend: String,
    #[serde(default)]
    pub raw_backend_response: serde_json::Value,
}
