//! Capacity-triggered eviction.
//!
//! After every write, a partition at or above its capacity drops its
//! oldest `max(1, capacity / 10)` entries by write recency. This is an
//! approximation of LRU driven by writes only: a read never makes an
//! entry younger.
//!
//! The count and the delete are separate store calls, so concurrent
//! writers near the threshold can briefly push a partition a few entries
//! past capacity before one of them evicts. Eviction never takes a
//! partition-wide lock.

use tracing::debug;

use crate::Result;
use crate::store::{Partition, PartitionStore};
use crate::telemetry;

/// Number of entries removed by one eviction pass.
pub fn eviction_batch(capacity: u64) -> u64 {
    (capacity / 10).max(1)
}

/// Evict from `store` if it holds `capacity` or more entries.
///
/// Returns the number of entries removed.
pub(crate) async fn enforce_capacity(
    partition: Partition,
    store: &dyn PartitionStore,
    capacity: u64,
) -> Result<u64> {
    let count = store.count().await?;
    if count < capacity {
        return Ok(0);
    }

    let removed = store.delete_oldest(eviction_batch(capacity)).await?;
    metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL, "partition" => partition.as_str())
        .increment(removed);
    debug!(%partition, count, capacity, removed, "evicted oldest cache entries");
    Ok(removed)
}
