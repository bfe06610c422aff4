//! Token bucket with continuous refill.

use std::sync::{Mutex, PoisonError};

use tokio::time::Instant;

/// One client's budget.
///
/// Capacity and refill rate are both the configured requests-per-second
/// limit. Refill and consumption happen under one lock, so concurrent
/// requests from the same client never double-spend a token.
#[derive(Debug)]
pub(crate) struct TokenBucket {
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    limit: u32,
    tokens: f64,
    last_refill: Instant,
}

impl BucketState {
    fn capacity(&self) -> f64 {
        f64::from(self.limit)
    }

    /// Credit tokens for the time since the last refill, capped at capacity.
    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.capacity()).min(self.capacity());
        self.last_refill = now;
    }

    fn remaining(&self) -> u32 {
        self.tokens.max(0.0).floor() as u32
    }
}

impl TokenBucket {
    /// A full bucket for `limit` requests per second.
    pub(crate) fn new(limit: u32) -> Self {
        Self {
            state: Mutex::new(BucketState {
                limit,
                tokens: f64::from(limit),
                last_refill: Instant::now(),
            }),
        }
    }

    /// Try to take one token. Returns the whole tokens left on success.
    ///
    /// A `limit` different from the bucket's current one reconfigures the
    /// bucket first, clamping the balance to the new capacity.
    pub(crate) fn try_consume(&self, limit: u32) -> Option<u32> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.refill(Instant::now());

        if state.limit != limit {
            state.limit = limit;
            state.tokens = state.tokens.min(state.capacity());
        }

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            Some(state.remaining())
        } else {
            None
        }
    }

    /// Whole tokens currently available.
    pub(crate) fn remaining(&self) -> u32 {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.refill(Instant::now());
        state.remaining()
    }

    /// Whether the bucket has refilled to capacity.
    pub(crate) fn is_full(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.refill(Instant::now());
        state.tokens >= state.capacity()
    }
}
