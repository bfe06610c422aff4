//! In-process partition store.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use async_trait::async_trait;

use super::{CacheEntry, PartitionStore};
use crate::{GeogateError, Result};

/// Thread-safe in-memory [`PartitionStore`].
///
/// Write recency is tracked with a monotonic sequence number alongside
/// the wall-clock `recorded_at`, so eviction order is exact even when two
/// writes land on the same clock tick or the clock steps backwards.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Slot>>,
    sequence: AtomicU64,
}

struct Slot {
    entry: CacheEntry,
    written: u64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> GeogateError {
    GeogateError::Storage(format!("memory store lock poisoned: {e}"))
}

#[async_trait]
impl PartitionStore for MemoryStore {
    async fn get_by_hash(&self, key: &str) -> Result<Option<CacheEntry>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).map(|slot| slot.entry.clone()))
    }

    async fn upsert(&self, key: &str, query_text: &str, payload: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        // Stamped under the write lock so sequence order is commit order.
        let written = self.next_sequence();
        entries.insert(
            key.to_string(),
            Slot {
                entry: CacheEntry {
                    key: key.to_string(),
                    query_text: query_text.to_string(),
                    payload: payload.to_string(),
                    recorded_at: SystemTime::now(),
                },
                written,
            },
        );
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.len() as u64)
    }

    async fn delete_oldest(&self, n: u64) -> Result<u64> {
        if n == 0 {
            return Ok(0);
        }
        let mut entries = self.entries.write().map_err(poisoned)?;

        let mut by_age: Vec<(u64, String)> = entries
            .iter()
            .map(|(key, slot)| (slot.written, key.clone()))
            .collect();
        by_age.sort_unstable();

        let mut removed = 0;
        for (_, key) in by_age.into_iter().take(n as usize) {
            if entries.remove(&key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
