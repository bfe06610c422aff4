//! Builder for configuring gateway instances

use std::sync::Arc;

use super::LookupGateway;
use crate::cache::{CacheConfig, CacheService};
use crate::config::Config;
use crate::limiter::{RateLimitConfig, RateLimiter};
use crate::providers::{GeoIpProvider, GeocodeProvider, ReverseGeocodeProvider};
use crate::{GeogateError, Result};

/// Builder for [`LookupGateway`].
///
/// Anything not set falls back to an in-memory cache with default
/// capacities, a fresh rate limiter and the default rate-limit settings.
/// A lookup kind without a provider is served from cache only.
#[derive(Default)]
pub struct LookupGatewayBuilder {
    cache_config: CacheConfig,
    rate_limit: RateLimitConfig,
    cache: Option<Arc<CacheService>>,
    limiter: Option<Arc<RateLimiter>>,
    geocoder: Option<Arc<dyn GeocodeProvider>>,
    reverse_geocoder: Option<Arc<dyn ReverseGeocodeProvider>>,
    geoip: Option<Arc<dyn GeoIpProvider>>,
}

impl LookupGatewayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take cache capacities and rate-limit settings from a loaded config.
    pub fn config(mut self, config: &Config) -> Self {
        self.cache_config = config.cache.clone();
        self.rate_limit = config.rate_limit.clone();
        self
    }

    /// Capacities for the default in-memory cache.
    ///
    /// Ignored when a cache is supplied with [`cache`](Self::cache).
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    /// Use an existing cache service, e.g. one over persistent stores.
    pub fn cache(mut self, cache: Arc<CacheService>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Share a rate limiter with other gateways or request paths.
    pub fn limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Register the forward geocoding provider.
    pub fn geocoder(mut self, provider: Arc<dyn GeocodeProvider>) -> Self {
        self.geocoder = Some(provider);
        self
    }

    /// Register the reverse geocoding provider.
    pub fn reverse_geocoder(mut self, provider: Arc<dyn ReverseGeocodeProvider>) -> Self {
        self.reverse_geocoder = Some(provider);
        self
    }

    /// Register the IP geolocation provider.
    pub fn geoip(mut self, provider: Arc<dyn GeoIpProvider>) -> Self {
        self.geoip = Some(provider);
        self
    }

    /// Build the gateway.
    ///
    /// Fails if the default rate limit is zero, which would reject every
    /// client that has no limit of its own.
    pub fn build(self) -> Result<LookupGateway> {
        if self.rate_limit.default_per_second == 0 {
            return Err(GeogateError::Configuration(
                "default rate limit must be positive".to_string(),
            ));
        }

        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(CacheService::in_memory(&self.cache_config)));
        let limiter = self.limiter.unwrap_or_default();

        Ok(LookupGateway {
            cache,
            limiter,
            rate_limit: self.rate_limit,
            geocoder: self.geocoder,
            reverse_geocoder: self.reverse_geocoder,
            geoip: self.geoip,
        })
    }
}
