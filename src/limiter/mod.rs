//! Per-client admission control.
//!
//! [`RateLimiter`] keeps one token bucket per client identity. Buckets are
//! created on a client's first request and reclaimed by a periodic sweep
//! once they have refilled to capacity: a full bucket is indistinguishable
//! from a fresh one, so dropping it loses nothing.
//!
//! Requests without an identity are admitted without touching the
//! registry. Authentication is the host's job; the limiter fails open.

mod bucket;
mod sweeper;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::telemetry;
use crate::types::{ClientIdentity, RateLimitStatus, reset_timestamp};
use crate::{GeogateError, Result};
use bucket::TokenBucket;

pub use sweeper::SweeperHandle;

/// Rate-limit settings. The `[rate_limit]` section of the TOML config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Budget for clients whose identity carries no limit of its own.
    #[serde(default = "default_per_second")]
    pub default_per_second: u32,
    /// Seconds between idle-bucket sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_per_second() -> u32 {
    10
}

fn default_sweep_interval_secs() -> u64 {
    300
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            default_per_second: default_per_second(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl RateLimitConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Limit to enforce for `client`: its own, or the default when unset.
    pub fn effective_limit(&self, client: &ClientIdentity) -> u32 {
        match client.rate_limit_per_second {
            0 => self.default_per_second,
            limit => limit,
        }
    }
}

/// Registry of per-identity token buckets.
///
/// Share one instance across request tasks behind an [`Arc`]. Lookups of
/// existing buckets take the read lock only; the write lock is held just
/// long enough to insert a new bucket or run a sweep.
#[derive(Debug, Default)]
pub struct RateLimiter {
    buckets: RwLock<HashMap<String, Arc<TokenBucket>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry and start its idle sweep on the current runtime.
    ///
    /// The returned handle stops the sweep. Dropping the registry also
    /// ends it at the next tick.
    pub fn with_sweeper(interval: Duration) -> (Arc<Self>, SweeperHandle) {
        let limiter = Arc::new(Self::new());
        let handle = limiter.start_sweeper(interval);
        (limiter, handle)
    }

    /// Bucket for `identity`, creating a full one for `limit` if absent.
    fn bucket(&self, identity: &str, limit: u32) -> Arc<TokenBucket> {
        // Fast path: read lock
        {
            let buckets = self.buckets.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(bucket) = buckets.get(identity) {
                return Arc::clone(bucket);
            }
        }

        // Slow path: write lock, check again in case another task won the race
        let mut buckets = self.buckets.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            buckets
                .entry(identity.to_string())
                .or_insert_with(|| Arc::new(TokenBucket::new(limit))),
        )
    }

    /// Consume one token; `Some(remaining)` when admitted.
    fn admit(&self, identity: &str, limit: u32) -> Option<u32> {
        let admitted = self.bucket(identity, limit).try_consume(limit);
        let decision = if admitted.is_some() { "allowed" } else { "denied" };
        metrics::counter!(telemetry::RATE_LIMIT_DECISIONS_TOTAL, "decision" => decision)
            .increment(1);
        admitted
    }

    /// Admit or deny one request from `identity` at `limit_per_second`.
    ///
    /// A limit that differs from the one the bucket was created with takes
    /// effect immediately.
    pub fn allow(&self, identity: &str, limit_per_second: u32) -> bool {
        self.admit(identity, limit_per_second).is_some()
    }

    /// Whole tokens left for `identity`; 0 for an identity never seen (or
    /// already reclaimed).
    pub fn remaining(&self, identity: &str) -> u32 {
        let buckets = self.buckets.read().unwrap_or_else(PoisonError::into_inner);
        buckets.get(identity).map_or(0, |bucket| bucket.remaining())
    }

    /// Admission check for a request.
    ///
    /// `None` means no identity: the request is admitted and no status is
    /// reported. A denial becomes [`GeogateError::RateLimited`].
    pub fn check(
        &self,
        client: Option<&ClientIdentity>,
        limit_per_second: u32,
    ) -> Result<Option<RateLimitStatus>> {
        let Some(client) = client else {
            return Ok(None);
        };

        match self.admit(&client.id, limit_per_second) {
            Some(remaining) => Ok(Some(RateLimitStatus::new(limit_per_second, remaining))),
            None => {
                debug!(client = %client.name, limit = limit_per_second, "rate limit exceeded");
                Err(GeogateError::RateLimited {
                    limit: limit_per_second,
                    remaining: 0,
                    reset_at: reset_timestamp(),
                })
            }
        }
    }

    /// Drop every bucket that has refilled to capacity.
    ///
    /// Returns how many were removed. A request racing with the sweep may
    /// spend a token on a bucket that is being dropped; the client simply
    /// starts over with a full bucket.
    pub fn sweep_idle(&self) -> usize {
        let mut buckets = self.buckets.write().unwrap_or_else(PoisonError::into_inner);
        let before = buckets.len();
        buckets.retain(|_, bucket| !bucket.is_full());
        let reclaimed = before - buckets.len();
        drop(buckets);

        if reclaimed > 0 {
            metrics::counter!(telemetry::RATE_LIMIT_BUCKETS_RECLAIMED_TOTAL)
                .increment(reclaimed as u64);
            info!(reclaimed, "reclaimed idle rate limit buckets");
        }
        reclaimed
    }

    /// Start the periodic idle sweep on the current tokio runtime.
    ///
    /// The task holds only a weak reference to the registry.
    pub fn start_sweeper(self: &Arc<Self>, interval: Duration) -> SweeperHandle {
        SweeperHandle::spawn(Arc::downgrade(self), interval)
    }

    /// Number of tracked identities.
    pub fn len(&self) -> usize {
        self.buckets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
