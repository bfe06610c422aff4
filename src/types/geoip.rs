//! IP geolocation types

use serde::{Deserialize, Serialize};

/// Standardized IP geolocation result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoIpResult {
    pub lat: f64,
    pub lng: f64,
    pub ip: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub org: String,
    pub backend: String,
    #[serde(default)]
    pub raw_backend_response: serde_json::Value,
}
