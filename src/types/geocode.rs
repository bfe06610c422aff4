//! Forward geocoding types

use serde::{Deserialize, Serialize};

/// Standardized forward-geocoding result.
///
/// `raw_backend_response` carries the provider's untouched payload so
/// callers can reach fields the standard shape does not expose.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
    #[serde(default)]
    pub state_name: String,
    #[serde(default)]
    pub state_code: String,
    pub country_name: String,
    pub country_code: String,
    pub backend: String,
    #[serde(default)]
    pub raw_backend_response: serde_json::Value,
}

impl GeocodeResult {
    /// Whether the provider resolved the query to a location.
    ///
    /// `(0, 0)` is what providers return for "no match".
    pub fn has_location(&self) -> bool {
        self.lat != 0.0 || self.lng != 0.0
    }
}

/// Address split into fields, as submitted to structured geocoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAddress {
    #[serde(default)]
    pub address_line_1: String,
    #[serde(default)]
    pub address_line_2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

impl StructuredAddress {
    /// True when every field is empty.
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|f| f.is_empty())
    }

    /// Join the non-empty fields with `", "`, most specific first.
    ///
    /// The result goes through the same normalization as a free-text
    /// address, so a structured query and its typed-out equivalent share
    /// a cache entry.
    pub fn to_formatted_string(&self) -> String {
        self.fields()
            .into_iter()
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn fields(&self) -> [&str; 6] {
        [
            &self.address_line_1,
            &self.address_line_2,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
    }
}
