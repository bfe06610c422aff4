//! Lookup outcome and rate-limit reporting types

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// `source` value for answers served from the cache.
pub const CACHE_SOURCE: &str = "cache";

/// Result of a gateway lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup<T> {
    pub value: T,
    /// Whether the value came from the cache partition.
    pub cache_hit: bool,
    /// `"cache"` on a hit, otherwise the name of the provider that answered.
    pub source: String,
    /// Budget snapshot for response headers; `None` when the request
    /// carried no client identity and was not rate limited.
    pub rate_limit: Option<RateLimitStatus>,
}

impl<T> Lookup<T> {
    pub(crate) fn cached(value: T, rate_limit: Option<RateLimitStatus>) -> Self {
        Self {
            value,
            cache_hit: true,
            source: CACHE_SOURCE.to_string(),
            rate_limit,
        }
    }

    pub(crate) fn fetched(value: T, provider: &str, rate_limit: Option<RateLimitStatus>) -> Self {
        Self {
            value,
            cache_hit: false,
            source: provider.to_string(),
            rate_limit,
        }
    }

    /// Discard the metadata and keep the value.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Client-visible budget facts for an admitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    /// Configured requests per second.
    pub limit: u32,
    /// Whole tokens left after this request.
    pub remaining: u32,
    /// Unix timestamp (seconds) at which the budget is back to full,
    /// approximated as now + 1s given per-second refill.
    pub reset_at: u64,
}

impl RateLimitStatus {
    pub fn new(limit: u32, remaining: u32) -> Self {
        Self {
            limit,
            remaining,
            reset_at: reset_timestamp(),
        }
    }

    /// `X-RateLimit-*` header name/value pairs.
    pub fn headers(&self) -> [(&'static str, String); 3] {
        [
            ("X-RateLimit-Limit", self.limit.to_string()),
            ("X-RateLimit-Remaining", self.remaining.to_string()),
            ("X-RateLimit-Reset", self.reset_at.to_string()),
        ]
    }
}

/// Now + 1 second, in Unix seconds.
pub(crate) fn reset_timestamp() -> u64 {
    (SystemTime::now() + Duration::from_secs(1))
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_carry_all_three_facts() {
        let status = RateLimitStatus {
            limit: 10,
            remaining: 7,
            reset_at: 1_700_000_001,
        };
        let headers = status.headers();
        assert_eq!(headers[0], ("X-RateLimit-Limit", "10".to_string()));
        assert_eq!(headers[1], ("X-RateLimit-Remaining", "7".to_string()));
        assert_eq!(headers[2], ("X-RateLimit-Reset", "1700000001".to_string()));
    }

    #[test]
    fn reset_is_in_the_future() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        assert!(RateLimitStatus::new(5, 4).reset_at >= now);
    }
}
