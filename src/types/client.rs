//! Client identity types

use serde::{Deserialize, Serialize};

/// An authenticated API client, as resolved by the host's credential layer.
///
/// Geogate never issues or validates credentials; it only needs a stable
/// `id` to key the client's token bucket and the client's configured
/// per-second budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub rate_limit_per_second: u32,
}

impl ClientIdentity {
    pub fn new(id: impl Into<String>, rate_limit_per_second: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            rate_limit_per_second,
        }
    }

    /// Set a human-readable name (used in logs only).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
