//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use geogate::telemetry;
use geogate::{
    CacheConfig, CacheService, ClientIdentity, GeoIpProvider, GeoIpResult, LookupGateway,
    MemoryStore, Partition, PartitionStore, RateLimiter, Result,
};

// ============================================================================
// Mock provider
// ============================================================================

struct MockGeoIp;

#[async_trait]
impl GeoIpProvider for MockGeoIp {
    fn name(&self) -> &str {
        "mock-geoip"
    }

    async fn lookup_ip(&self, ip: &str) -> Result<GeoIpResult> {
        Ok(GeoIpResult {
            ip: ip.into(),
            city: "Mountain View".into(),
            backend: "mock".into(),
            ..Default::default()
        })
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    counter_with_label(snapshot, name, None)
}

/// Sum counter values for `name`, optionally restricted to one label value.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: Option<(&str, &str)>) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .filter(|(key, _, _, _)| match label {
            Some((k, v)) => key.key().labels().any(|l| l.key() == k && l.value() == v),
            None => true,
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_hits_and_misses_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let cache = CacheService::in_memory(&CacheConfig::default());
                assert!(cache.get_ip("8.8.8.8").await.is_none());
                cache
                    .set_ip("8.8.8.8", &GeoIpResult::default())
                    .await
                    .unwrap();
                assert!(cache.get_ip("8.8.8.8").await.is_some());
                assert!(cache.get_ip("8.8.8.8").await.is_some());
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CACHE_MISSES_TOTAL, Some(("partition", "ip"))),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CACHE_HITS_TOTAL, Some(("partition", "ip"))),
        2
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn evictions_count_removed_entries() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let config = CacheConfig::new().max_ip_entries(20);
                let cache = CacheService::in_memory(&config);
                for i in 0..20 {
                    let ip = format!("10.0.0.{i}");
                    cache.set_ip(&ip, &GeoIpResult::default()).await.unwrap();
                }
                assert_eq!(cache.entry_count(Partition::Ip).await.unwrap(), 18);
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_EVICTIONS_TOTAL), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn corrupt_entry_counts_as_miss() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let ip_store = Arc::new(MemoryStore::new());
                ip_store
                    .upsert(&geogate::normalize::ip_key("1.1.1.1"), "1.1.1.1", "[]")
                    .await
                    .unwrap();
                let cache = CacheService::new(
                    &CacheConfig::default(),
                    Arc::new(MemoryStore::new()),
                    ip_store,
                    Arc::new(MemoryStore::new()),
                );
                assert!(cache.get_ip("1.1.1.1").await.is_none());
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 0);
}

#[test]
fn admission_decisions_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let limiter = RateLimiter::new();
        assert!(limiter.allow("key", 1));
        assert!(!limiter.allow("key", 1));
        assert!(!limiter.allow("key", 1));
    });

    let snapshot = snapshotter.snapshot().into_vec();
    let decisions = telemetry::RATE_LIMIT_DECISIONS_TOTAL;
    assert_eq!(counter_with_label(&snapshot, decisions, Some(("decision", "allowed"))), 1);
    assert_eq!(counter_with_label(&snapshot, decisions, Some(("decision", "denied"))), 2);
}

#[test]
fn reclaimed_buckets_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let limiter = RateLimiter::new();
        // A zero-limit bucket is always at capacity.
        assert!(!limiter.allow("a", 0));
        assert!(!limiter.allow("b", 0));
        assert_eq!(limiter.sweep_idle(), 2);
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_total(&snapshot, telemetry::RATE_LIMIT_BUCKETS_RECLAIMED_TOTAL),
        2
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn lookups_record_source_and_duration() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let gateway = LookupGateway::builder()
                    .geoip(Arc::new(MockGeoIp))
                    .build()
                    .unwrap();
                let client = ClientIdentity::new("key-1", 2);
                gateway.geoip(Some(&client), "8.8.8.8").await.unwrap();
                gateway.geoip(Some(&client), "8.8.8.8").await.unwrap();
                gateway.geoip(Some(&client), "8.8.8.8").await.unwrap_err();
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    let lookups = telemetry::LOOKUPS_TOTAL;
    assert_eq!(counter_total(&snapshot, lookups), 3);
    assert_eq!(counter_with_label(&snapshot, lookups, Some(("source", "mock-geoip"))), 1);
    assert_eq!(counter_with_label(&snapshot, lookups, Some(("source", "cache"))), 1);
    assert_eq!(counter_with_label(&snapshot, lookups, Some(("status", "error"))), 1);
    assert!(
        has_histogram(&snapshot, telemetry::LOOKUP_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let gateway = LookupGateway::builder()
        .geoip(Arc::new(MockGeoIp))
        .build()
        .unwrap();
    gateway.geoip(None, "8.8.8.8").await.unwrap();
}
