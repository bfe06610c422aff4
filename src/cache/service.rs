//! Cache service over the three partitions.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::eviction;
use crate::Result;
use crate::normalize;
use crate::store::{MemoryStore, Partition, PartitionStore};
use crate::telemetry;
use crate::types::{GeoIpResult, GeocodeResult, ReverseGeocodeResult, StructuredAddress};

/// Capacity bounds for the cache partitions.
///
/// Also the `[cache]` section of the TOML configuration.
///
/// ```rust
/// # use geogate::CacheConfig;
/// let config = CacheConfig::new()
///     .max_address_entries(50_000)
///     .max_ip_entries(20_000);
/// assert_eq!(config.reverse_geocode_capacity(), 50_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum entries in the address partition. Default: 10,000.
    #[serde(default = "default_max_address_entries")]
    pub max_address_entries: u64,
    /// Maximum entries in the IP partition. Default: 5,000.
    #[serde(default = "default_max_ip_entries")]
    pub max_ip_entries: u64,
    /// Maximum entries in the reverse-geocode partition.
    /// Default: same as `max_address_entries`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_reverse_geocode_entries: Option<u64>,
}

fn default_max_address_entries() -> u64 {
    10_000
}

fn default_max_ip_entries() -> u64 {
    5_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_address_entries: default_max_address_entries(),
            max_ip_entries: default_max_ip_entries(),
            max_reverse_geocode_entries: None,
        }
    }
}

impl CacheConfig {
    /// Create a config with default capacities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the address partition capacity.
    pub fn max_address_entries(mut self, n: u64) -> Self {
        self.max_address_entries = n;
        self
    }

    /// Set the IP partition capacity.
    pub fn max_ip_entries(mut self, n: u64) -> Self {
        self.max_ip_entries = n;
        self
    }

    /// Set the reverse-geocode partition capacity.
    pub fn max_reverse_geocode_entries(mut self, n: u64) -> Self {
        self.max_reverse_geocode_entries = Some(n);
        self
    }

    /// Effective reverse-geocode capacity.
    pub fn reverse_geocode_capacity(&self) -> u64 {
        self.max_reverse_geocode_entries
            .unwrap_or(self.max_address_entries)
    }

    /// Capacity for `partition`.
    pub fn capacity(&self, partition: Partition) -> u64 {
        match partition {
            Partition::Address => self.max_address_entries,
            Partition::Ip => self.max_ip_entries,
            Partition::ReverseGeocode => self.reverse_geocode_capacity(),
        }
    }
}

/// One partition: its store and its capacity bound.
struct PartitionCache {
    partition: Partition,
    store: Arc<dyn PartitionStore>,
    capacity: u64,
}

impl PartitionCache {
    async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = match self.store.get_by_hash(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                self.record_miss();
                return None;
            }
            Err(e) => {
                warn!(
                    partition = %self.partition,
                    error = %e,
                    "cache lookup failed, treating as miss"
                );
                self.record_miss();
                return None;
            }
        };

        match serde_json::from_str(&entry.payload) {
            Ok(value) => {
                metrics::counter!(
                    telemetry::CACHE_HITS_TOTAL,
                    "partition" => self.partition.as_str()
                )
                .increment(1);
                Some(value)
            }
            Err(e) => {
                warn!(
                    partition = %self.partition,
                    query = %entry.query_text,
                    error = %e,
                    "undecodable cached payload, treating as miss"
                );
                self.record_miss();
                None
            }
        }
    }

    async fn set<T: Serialize>(&self, key: &str, query_text: &str, value: &T) -> Result<()> {
        let outcome = self.write(key, query_text, value).await;
        if outcome.is_err() {
            metrics::counter!(
                telemetry::CACHE_WRITE_ERRORS_TOTAL,
                "partition" => self.partition.as_str()
            )
            .increment(1);
        }
        outcome
    }

    async fn write<T: Serialize>(&self, key: &str, query_text: &str, value: &T) -> Result<()> {
        let payload = serde_json::to_string(value)?;
        self.store.upsert(key, query_text, &payload).await?;
        debug!(partition = %self.partition, key, "cached lookup result");
        eviction::enforce_capacity(self.partition, self.store.as_ref(), self.capacity).await?;
        Ok(())
    }

    fn record_miss(&self) {
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "partition" => self.partition.as_str())
            .increment(1);
    }
}

/// Normalizing, serializing cache over the address, IP and
/// reverse-geocode partitions.
///
/// `get_*` methods return `None` for any kind of miss and never fail.
/// `set_*` methods return serialization and store errors; callers should
/// log them and carry on with the value they computed.
pub struct CacheService {
    address: PartitionCache,
    ip: PartitionCache,
    reverse: PartitionCache,
}

impl CacheService {
    /// Build a service over caller-provided partition stores.
    ///
    /// Capacities below 1 are raised to 1.
    pub fn new(
        config: &CacheConfig,
        address: Arc<dyn PartitionStore>,
        ip: Arc<dyn PartitionStore>,
        reverse_geocode: Arc<dyn PartitionStore>,
    ) -> Self {
        let partition = |partition: Partition, store: Arc<dyn PartitionStore>| PartitionCache {
            partition,
            store,
            capacity: config.capacity(partition).max(1),
        };
        Self {
            address: partition(Partition::Address, address),
            ip: partition(Partition::Ip, ip),
            reverse: partition(Partition::ReverseGeocode, reverse_geocode),
        }
    }

    /// Build a service backed by three fresh [`MemoryStore`]s.
    pub fn in_memory(config: &CacheConfig) -> Self {
        Self::new(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        )
    }

    fn partition(&self, partition: Partition) -> &PartitionCache {
        match partition {
            Partition::Address => &self.address,
            Partition::Ip => &self.ip,
            Partition::ReverseGeocode => &self.reverse,
        }
    }

    /// Configured capacity of `partition`.
    pub fn capacity(&self, partition: Partition) -> u64 {
        self.partition(partition).capacity
    }

    /// Current number of entries in `partition`.
    pub async fn entry_count(&self, partition: Partition) -> Result<u64> {
        self.partition(partition).store.count().await
    }

    // ===== Forward geocoding (free text) =====

    /// Cached forward-geocoding result for a free-text address.
    pub async fn get_geocode(&self, address: &str) -> Option<GeocodeResult> {
        self.address.get(&normalize::address_key(address)).await
    }

    /// Cache a forward-geocoding result for a free-text address.
    pub async fn set_geocode(&self, address: &str, result: &GeocodeResult) -> Result<()> {
        self.address
            .set(&normalize::address_key(address), address, result)
            .await
    }

    // ===== Forward geocoding (structured) =====

    /// Cached result for a structured address.
    ///
    /// Shares entries with the free-text form of the same address.
    pub async fn get_structured_geocode(
        &self,
        address: &StructuredAddress,
    ) -> Option<GeocodeResult> {
        self.get_geocode(&address.to_formatted_string()).await
    }

    /// Cache a result for a structured address.
    pub async fn set_structured_geocode(
        &self,
        address: &StructuredAddress,
        result: &GeocodeResult,
    ) -> Result<()> {
        self.set_geocode(&address.to_formatted_string(), result)
            .await
    }

    // ===== IP geolocation =====

    /// Cached geolocation for an IP literal.
    pub async fn get_ip(&self, ip: &str) -> Option<GeoIpResult> {
        self.ip.get(&normalize::ip_key(ip)).await
    }

    /// Cache a geolocation result for an IP literal.
    pub async fn set_ip(&self, ip: &str, result: &GeoIpResult) -> Result<()> {
        self.ip.set(&normalize::ip_key(ip), ip, result).await
    }

    // ===== Reverse geocoding =====

    /// Cached reverse-geocoding result for a coordinate pair.
    pub async fn get_reverse_geocode(&self, lat: f64, lng: f64) -> Option<ReverseGeocodeResult> {
        self.reverse
            .get(&normalize::coordinate_key(lat, lng))
            .await
    }

    /// Cache a reverse-geocoding result for a coordinate pair.
    pub async fn set_reverse_geocode(
        &self,
        lat: f64,
        lng: f64,
        result: &ReverseGeocodeResult,
    ) -> Result<()> {
        let query_text = format!("{lat},{lng}");
        self.reverse
            .set(&normalize::coordinate_key(lat, lng), &query_text, result)
            .await
    }
}
