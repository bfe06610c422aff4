//! Telemetry metric name constants.
//!
//! Centralised metric names for geogate operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `geogate_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `partition`: cache partition ("address", "ip", "reverse_geocode")
//! - `operation`: gateway lookup ("geocode", "geocode_structured", "geoip", "reverse_geocode")
//! - `source`: "cache" or the provider name that answered
//! - `status`: outcome: "ok" or "error"

/// Total cache hits.
///
/// Labels: `partition`.
pub const CACHE_HITS_TOTAL: &str = "geogate_cache_hits_total";

/// Total cache misses (not-found, store error, or undecodable payload).
///
/// Labels: `partition`.
pub const CACHE_MISSES_TOTAL: &str = "geogate_cache_misses_total";

/// Total failed cache writes (serialization or store error).
///
/// Labels: `partition`.
pub const CACHE_WRITE_ERRORS_TOTAL: &str = "geogate_cache_write_errors_total";

/// Total entries removed by capacity eviction.
///
/// Labels: `partition`.
pub const CACHE_EVICTIONS_TOTAL: &str = "geogate_cache_evictions_total";

/// Total admission decisions.
///
/// Labels: `decision` ("allowed" | "denied").
pub const RATE_LIMIT_DECISIONS_TOTAL: &str = "geogate_rate_limit_decisions_total";

/// Total idle buckets removed by the reclamation sweep.
pub const RATE_LIMIT_BUCKETS_RECLAIMED_TOTAL: &str = "geogate_rate_limit_buckets_reclaimed_total";

/// Total lookups served by the gateway.
///
/// Labels: `operation`, `source`, `status`.
pub const LOOKUPS_TOTAL: &str = "geogate_lookups_total";

/// Lookup duration in seconds, admission through response.
///
/// Labels: `operation`.
pub const LOOKUP_DURATION_SECONDS: &str = "geogate_lookup_duration_seconds";
