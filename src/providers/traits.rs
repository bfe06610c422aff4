//! Provider traits, one per lookup kind.
//!
//! The transport to the external service (HTTP client, credentials,
//! retries) belongs to the implementation. The gateway only needs the
//! standardized result and a name to report as the answer's `source`.
//!
//! # Errors
//!
//! Implementations report transport and upstream failures as
//! [`GeogateError::Provider`](crate::GeogateError::Provider) and an
//! upstream "zero results" answer as
//! [`GeogateError::NoResults`](crate::GeogateError::NoResults). The
//! gateway propagates both unchanged and caches nothing.

use async_trait::async_trait;

use crate::Result;
use crate::types::{GeoIpResult, GeocodeResult, ReverseGeocodeResult};

// ============================================================================
// Forward geocoding
// ============================================================================

/// Resolves a free-text address to coordinates.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Provider name for logging and the lookup `source`.
    fn name(&self) -> &str;

    /// Geocode `address` exactly as the client wrote it.
    async fn geocode(&self, address: &str) -> Result<GeocodeResult>;
}

// ============================================================================
// Reverse geocoding
// ============================================================================

/// Resolves coordinates to an address.
#[async_trait]
pub trait ReverseGeocodeProvider: Send + Sync {
    /// Provider name for logging and the lookup `source`.
    fn name(&self) -> &str;

    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<ReverseGeocodeResult>;
}

// ============================================================================
// IP geolocation
// ============================================================================

/// Locates an IP address.
#[async_trait]
pub trait GeoIpProvider: Send + Sync {
    /// Provider name for logging and the lookup `source`.
    fn name(&self) -> &str;

    /// Look up `ip`, already validated as an IPv4 or IPv6 literal.
    async fn lookup_ip(&self, ip: &str) -> Result<GeoIpResult>;
}
