//! The lookup gateway: admission, cache, provider, write-back.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use super::{LookupGatewayBuilder, validate};
use crate::cache::CacheService;
use crate::limiter::{RateLimitConfig, RateLimiter, SweeperHandle};
use crate::providers::{GeoIpProvider, GeocodeProvider, ReverseGeocodeProvider};
use crate::telemetry;
use crate::types::{
    ClientIdentity, GeoIpResult, GeocodeResult, Lookup, RateLimitStatus, ReverseGeocodeResult,
    StructuredAddress,
};
use crate::{GeogateError, Result};

/// Front door for geocoding, reverse geocoding and IP geolocation.
///
/// Every lookup runs the same steps:
///
/// 1. charge the client's token bucket (skipped when there is no client);
/// 2. validate the query;
/// 3. answer from the cache partition on a hit;
/// 4. otherwise call the provider and write the answer back.
///
/// A failed write-back is logged and the fresh answer is still returned.
/// Provider errors are returned as-is and nothing is cached.
pub struct LookupGateway {
    pub(super) cache: Arc<CacheService>,
    pub(super) limiter: Arc<RateLimiter>,
    pub(super) rate_limit: RateLimitConfig,
    pub(super) geocoder: Option<Arc<dyn GeocodeProvider>>,
    pub(super) reverse_geocoder: Option<Arc<dyn ReverseGeocodeProvider>>,
    pub(super) geoip: Option<Arc<dyn GeoIpProvider>>,
}

impl LookupGateway {
    pub fn builder() -> LookupGatewayBuilder {
        LookupGatewayBuilder::new()
    }

    pub fn cache(&self) -> &Arc<CacheService> {
        &self.cache
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Start the limiter's idle sweep at the configured interval.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_sweeper(&self) -> SweeperHandle {
        self.limiter.start_sweeper(self.rate_limit.sweep_interval())
    }

    // ===== Public lookups =====

    /// Forward-geocode a free-text address.
    #[instrument(skip_all, fields(operation = "geocode"))]
    pub async fn geocode(
        &self,
        client: Option<&ClientIdentity>,
        address: &str,
    ) -> Result<Lookup<GeocodeResult>> {
        let start = Instant::now();
        let outcome = self.geocode_text(client, address).await;
        record_lookup("geocode", start, outcome)
    }

    /// Forward-geocode a structured address.
    ///
    /// Shares cache entries with [`geocode`](Self::geocode) for the
    /// equivalent free-text address.
    #[instrument(skip_all, fields(operation = "geocode_structured"))]
    pub async fn geocode_structured(
        &self,
        client: Option<&ClientIdentity>,
        address: &StructuredAddress,
    ) -> Result<Lookup<GeocodeResult>> {
        let start = Instant::now();
        let outcome = self.geocode_fields(client, address).await;
        record_lookup("geocode_structured", start, outcome)
    }

    /// Locate an IP address.
    #[instrument(skip_all, fields(operation = "geoip"))]
    pub async fn geoip(
        &self,
        client: Option<&ClientIdentity>,
        ip: &str,
    ) -> Result<Lookup<GeoIpResult>> {
        let start = Instant::now();
        let outcome = self.locate_ip(client, ip).await;
        record_lookup("geoip", start, outcome)
    }

    /// Reverse-geocode a coordinate pair.
    #[instrument(skip_all, fields(operation = "reverse_geocode"))]
    pub async fn reverse_geocode(
        &self,
        client: Option<&ClientIdentity>,
        lat: f64,
        lng: f64,
    ) -> Result<Lookup<ReverseGeocodeResult>> {
        let start = Instant::now();
        let outcome = self.resolve_coordinates(client, lat, lng).await;
        record_lookup("reverse_geocode", start, outcome)
    }

    // ===== Steps =====

    fn admit(&self, client: Option<&ClientIdentity>) -> Result<Option<RateLimitStatus>> {
        let limit = client.map_or(0, |c| self.rate_limit.effective_limit(c));
        self.limiter.check(client, limit)
    }

    async fn geocode_text(
        &self,
        client: Option<&ClientIdentity>,
        address: &str,
    ) -> Result<Lookup<GeocodeResult>> {
        let rate_limit = self.admit(client)?;
        validate::address(address)?;
        self.resolve_address(address, rate_limit).await
    }

    async fn geocode_fields(
        &self,
        client: Option<&ClientIdentity>,
        address: &StructuredAddress,
    ) -> Result<Lookup<GeocodeResult>> {
        let rate_limit = self.admit(client)?;
        validate::structured_address(address)?;
        self.resolve_address(&address.to_formatted_string(), rate_limit)
            .await
    }

    async fn resolve_address(
        &self,
        address: &str,
        rate_limit: Option<RateLimitStatus>,
    ) -> Result<Lookup<GeocodeResult>> {
        if let Some(hit) = self.cache.get_geocode(address).await {
            debug!("geocode served from cache");
            return Ok(Lookup::cached(hit, rate_limit));
        }

        let provider = self
            .geocoder
            .as_deref()
            .ok_or(GeogateError::ProviderNotConfigured("geocoding"))?;
        let result = provider.geocode(address).await?;
        if !result.has_location() {
            debug!(provider = provider.name(), "geocode resolved to no location");
        }

        if let Err(e) = self.cache.set_geocode(address, &result).await {
            warn!(provider = provider.name(), error = %e, "failed to cache geocode result");
        }
        Ok(Lookup::fetched(result, provider.name(), rate_limit))
    }

    async fn locate_ip(
        &self,
        client: Option<&ClientIdentity>,
        ip: &str,
    ) -> Result<Lookup<GeoIpResult>> {
        let rate_limit = self.admit(client)?;
        validate::ip(ip)?;

        if let Some(hit) = self.cache.get_ip(ip).await {
            debug!("geoip served from cache");
            return Ok(Lookup::cached(hit, rate_limit));
        }

        let provider = self
            .geoip
            .as_deref()
            .ok_or(GeogateError::ProviderNotConfigured("IP geolocation"))?;
        let result = provider.lookup_ip(ip).await?;

        if let Err(e) = self.cache.set_ip(ip, &result).await {
            warn!(provider = provider.name(), error = %e, "failed to cache geoip result");
        }
        Ok(Lookup::fetched(result, provider.name(), rate_limit))
    }

    async fn resolve_coordinates(
        &self,
        client: Option<&ClientIdentity>,
        lat: f64,
        lng: f64,
    ) -> Result<Lookup<ReverseGeocodeResult>> {
        let rate_limit = self.admit(client)?;
        validate::coordinates(lat, lng)?;

        if let Some(hit) = self.cache.get_reverse_geocode(lat, lng).await {
            debug!("reverse geocode served from cache");
            return Ok(Lookup::cached(hit, rate_limit));
        }

        let provider = self
            .reverse_geocoder
            .as_deref()
            .ok_or(GeogateError::ProviderNotConfigured("reverse geocoding"))?;
        let result = provider.reverse_geocode(lat, lng).await?;

        if let Err(e) = self.cache.set_reverse_geocode(lat, lng, &result).await {
            warn!(provider = provider.name(), error = %e, "failed to cache reverse geocode result");
        }
        Ok(Lookup::fetched(result, provider.name(), rate_limit))
    }
}

/// Record the outcome and latency of one lookup.
fn record_lookup<T>(
    operation: &'static str,
    start: Instant,
    outcome: Result<Lookup<T>>,
) -> Result<Lookup<T>> {
    let (source, status) = match &outcome {
        Ok(lookup) => (lookup.source.clone(), "ok"),
        Err(_) => ("none".to_string(), "error"),
    };
    metrics::counter!(telemetry::LOOKUPS_TOTAL,
        "operation" => operation,
        "source" => source,
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::LOOKUP_DURATION_SECONDS, "operation" => operation)
        .record(start.elapsed().as_secs_f64());
    outcome
}
