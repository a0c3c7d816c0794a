//! Metrics and observability utilities
//!
//! Metric names share the `pressroom` prefix. Recording is a no-op until a
//! recorder (the Prometheus exporter in the API binary) is installed.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all Pressroom metrics
pub const METRICS_PREFIX: &str = "pressroom";

/// Histogram buckets for request latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001, // 1ms
    0.005, // 5ms
    0.010, // 10ms
    0.025, // 25ms
    0.050, // 50ms
    0.100, // 100ms
    0.250, // 250ms
    0.500, // 500ms
    1.000, // 1s
    2.500, // 2.5s
    5.000, // 5s
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    describe_counter!(
        format!("{}_entities_created_total", METRICS_PREFIX),
        Unit::Count,
        "Records created, by entity kind"
    );

    describe_counter!(
        format!("{}_entities_deleted_total", METRICS_PREFIX),
        Unit::Count,
        "Records deleted, by entity kind"
    );

    describe_counter!(
        format!("{}_uploads_total", METRICS_PREFIX),
        Unit::Count,
        "Media files stored"
    );

    describe_counter!(
        format!("{}_upload_bytes_total", METRICS_PREFIX),
        Unit::Bytes,
        "Bytes written by media uploads"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Count a committed insert
pub fn record_created(kind: &'static str) {
    counter!(format!("{}_entities_created_total", METRICS_PREFIX), "kind" => kind).increment(1);
}

/// Count a committed delete
pub fn record_deleted(kind: &'static str) {
    counter!(format!("{}_entities_deleted_total", METRICS_PREFIX), "kind" => kind).increment(1);
}

/// Count a stored upload
pub fn record_upload(media_kind: &'static str, bytes: usize) {
    counter!(format!("{}_uploads_total", METRICS_PREFIX), "kind" => media_kind).increment(1);
    counter!(format!("{}_upload_bytes_total", METRICS_PREFIX)).increment(bytes as u64);
}
