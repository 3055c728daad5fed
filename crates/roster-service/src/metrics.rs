//! Prometheus metrics for the cache-aside layer.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Metric names for the cache layer.
pub mod names {
    /// Cache lookups, labelled by outcome (hit, miss, unavailable).
    pub const CACHE_LOOKUPS_TOTAL: &str = "roster_cache_lookups_total";
    /// Best-effort cache writes that failed.
    pub const CACHE_WRITES_FAILED_TOTAL: &str = "roster_cache_writes_failed_total";
    /// Point keys invalidated after a mutation.
    pub const CACHE_INVALIDATIONS_TOTAL: &str = "roster_cache_invalidations_total";
    /// Collection keys removed by prefix sweeps.
    pub const CACHE_SWEPT_KEYS_TOTAL: &str = "roster_cache_swept_keys_total";
    /// Round-trip time of a single cache call.
    pub const CACHE_OPERATION_DURATION: &str = "roster_cache_operation_duration_seconds";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::CACHE_LOOKUPS_TOTAL,
        "Cache lookups by outcome"
    );
    describe_counter!(
        names::CACHE_WRITES_FAILED_TOTAL,
        "Cache population attempts that failed and were skipped"
    );
    describe_counter!(
        names::CACHE_INVALIDATIONS_TOTAL,
        "Point cache keys deleted after a mutation"
    );
    describe_counter!(
        names::CACHE_SWEPT_KEYS_TOTAL,
        "List and search cache keys deleted by prefix sweeps"
    );
    describe_histogram!(
        names::CACHE_OPERATION_DURATION,
        "Cache operation duration in seconds"
    );
}

/// Cache metrics recorder.
#[derive(Clone)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record the outcome of a lookup.
    pub fn lookup(outcome: &'static str) {
        counter!(names::CACHE_LOOKUPS_TOTAL, "outcome" => outcome).increment(1);
    }

    /// Record a failed population.
    pub fn write_failed() {
        counter!(names::CACHE_WRITES_FAILED_TOTAL).increment(1);
    }

    /// Record a point-key invalidation.
    pub fn invalidated() {
        counter!(names::CACHE_INVALIDATIONS_TOTAL).increment(1);
    }

    /// Record keys removed by a sweep.
    pub fn swept(count: usize) {
        counter!(names::CACHE_SWEPT_KEYS_TOTAL).increment(count as u64);
    }

    /// Record how long a cache call took.
    pub fn operation(op: &'static str, elapsed: Duration, ok: bool) {
        histogram!(
            names::CACHE_OPERATION_DURATION,
            "op" => op,
            "status" => if ok { "ok" } else { "error" }
        )
        .record(elapsed.as_secs_f64());
    }
}
