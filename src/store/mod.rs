//! Cache partition storage.
//!
//! A [`PartitionStore`] holds one partition's entries: a content-hash key,
//! the original query text, the serialized payload and a recency stamp.
//! The store only needs to be a keyed insert-or-replace table with a
//! "delete the N oldest" operation; the eviction *policy* (when and how
//! many) lives in [`crate::cache`], so every backend evicts the same way.
//!
//! [`MemoryStore`] is the in-process implementation. Persistent backends
//! (a SQL table per partition, for example) implement the same trait and
//! plug into [`CacheService`](crate::cache::CacheService) unchanged.

mod memory;

pub use memory::MemoryStore;

use std::fmt;
use std::time::SystemTime;

use async_trait::async_trait;

use crate::Result;

/// One of the independently bounded cache namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    /// Forward geocoding, free-text and structured addresses.
    Address,
    /// IP geolocation.
    Ip,
    /// Coordinate reverse lookups.
    ReverseGeocode,
}

impl Partition {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Ip => "ip",
            Self::ReverseGeocode => "reverse_geocode",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored cache row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Content hash of the normalized query.
    pub key: String,
    /// The query as the caller wrote it, kept for diagnostics.
    pub query_text: String,
    /// Serialized result. Opaque to the store.
    pub payload: String,
    /// Set on insert, refreshed on every upsert of the same key. Reads do
    /// not touch it.
    pub recorded_at: SystemTime,
}

/// Storage contract for one cache partition.
///
/// Individual operations must be atomic with respect to each other for a
/// single key (`upsert` is insert-or-replace). No atomicity is required
/// across operations: a `count` followed by `delete_oldest` may interleave
/// with other writers.
#[async_trait]
pub trait PartitionStore: Send + Sync {
    /// Fetch the entry stored under `key`, or `None` if there is none.
    async fn get_by_hash(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Insert or replace the entry for `key`, refreshing `recorded_at`.
    async fn upsert(&self, key: &str, query_text: &str, payload: &str) -> Result<()>;

    /// Number of entries currently stored.
    async fn count(&self) -> Result<u64>;

    /// Remove up to `n` entries with the oldest `recorded_at`.
    ///
    /// Returns how many were actually removed.
    async fn delete_oldest(&self, n: u64) -> Result<u64>;
}
