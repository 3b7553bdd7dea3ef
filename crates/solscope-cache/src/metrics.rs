//! Prometheus metrics for the data-access boundary.
//!
//! Counters are recorded through the `metrics` facade; without an installed
//! recorder every call is a no-op.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Metric names for the boundary layer.
pub mod names {
    /// Responses served from the cache.
    pub const CACHE_HITS_TOTAL: &str = "solscope_cache_hits_total";
    /// Lookups that found no live entry.
    pub const CACHE_MISSES_TOTAL: &str = "solscope_cache_misses_total";
    /// Entries removed by the background sweep.
    pub const CACHE_EVICTIONS_TOTAL: &str = "solscope_cache_evictions_total";
    /// Entries currently stored.
    pub const CACHE_ENTRIES: &str = "solscope_cache_entries";

    /// Callers that attached to an outstanding upstream call.
    pub const COALESCED_TOTAL: &str = "solscope_coalesced_requests_total";
    /// Upstream calls currently outstanding.
    pub const IN_FLIGHT: &str = "solscope_upstream_in_flight";

    /// Upstream calls issued, by endpoint and outcome.
    pub const UPSTREAM_CALLS_TOTAL: &str = "solscope_upstream_calls_total";
    /// Upstream call duration in seconds.
    pub const UPSTREAM_DURATION_SECONDS: &str = "solscope_upstream_duration_seconds";

    /// Requests rejected by input validation.
    pub const VALIDATION_FAILURES_TOTAL: &str = "solscope_validation_failures_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Total number of responses served from the cache");
    describe_counter!(names::CACHE_MISSES_TOTAL, "Total number of cache lookups without a live entry");
    describe_counter!(
        names::CACHE_EVICTIONS_TOTAL,
        "Total number of expired entries removed by the sweeper"
    );
    describe_gauge!(names::CACHE_ENTRIES, "Current number of cache entries");

    describe_counter!(
        names::COALESCED_TOTAL,
        "Total number of requests that joined an outstanding upstream call"
    );
    describe_gauge!(names::IN_FLIGHT, "Current number of outstanding upstream calls");

    describe_counter!(names::UPSTREAM_CALLS_TOTAL, "Total number of upstream calls");
    describe_histogram!(names::UPSTREAM_DURATION_SECONDS, "Upstream call duration in seconds");

    describe_counter!(
        names::VALIDATION_FAILURES_TOTAL,
        "Total number of requests rejected by input validation"
    );
}

/// Boundary metrics recorder.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundaryMetrics;

impl BoundaryMetrics {
    /// Record a cache hit.
    pub fn cache_hit(endpoint: &'static str) {
        counter!(names::CACHE_HITS_TOTAL, "endpoint" => endpoint).increment(1);
    }

    /// Record a cache miss.
    pub fn cache_miss(endpoint: &'static str) {
        counter!(names::CACHE_MISSES_TOTAL, "endpoint" => endpoint).increment(1);
    }

    /// Record a sweep.
    pub fn cache_swept(evicted: usize, remaining: usize) {
        counter!(names::CACHE_EVICTIONS_TOTAL).increment(evicted as u64);
        gauge!(names::CACHE_ENTRIES).set(remaining as f64);
    }

    /// Record a caller attaching to an outstanding call.
    pub fn coalesced() {
        counter!(names::COALESCED_TOTAL).increment(1);
    }

    /// Update the outstanding call gauge.
    pub fn in_flight(count: usize) {
        gauge!(names::IN_FLIGHT).set(count as f64);
    }

    /// Record a settled upstream call.
    pub fn upstream_call(endpoint: &'static str, outcome: &'static str, duration: Duration) {
        counter!(
            names::UPSTREAM_CALLS_TOTAL,
            "endpoint" => endpoint,
            "outcome" => outcome
        )
        .increment(1);

        histogram!(
            names::UPSTREAM_DURATION_SECONDS,
            "endpoint" => endpoint,
            "outcome" => outcome
        )
        .record(duration.as_secs_f64());
    }

    /// Record a validation rejection.
    pub fn validation_failed(param: &'static str) {
        counter!(names::VALIDATION_FAILURES_TOTAL, "param" => param).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::CACHE_HITS_TOTAL.starts_with("solscope_"));
        assert!(names::UPSTREAM_CALLS_TOTAL.ends_with("_total"));
        assert!(names::UPSTREAM_DURATION_SECONDS.ends_with("_seconds"));
    }

    #[test]
    fn test_recording_without_recorder() {
        register_metrics();
        BoundaryMetrics::cache_hit("token");
        BoundaryMetrics::cache_miss("token");
        BoundaryMetrics::coalesced();
        BoundaryMetrics::upstream_call("stats", "success", Duration::from_millis(20));
        BoundaryMetrics::cache_swept(3, 7);
    }
}
