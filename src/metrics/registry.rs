// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_gauge_vec_with_registry,
    register_histogram_vec_with_registry, CounterVec, Encoder, GaugeVec, HistogramVec, Opts,
    Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // REQUEST METRICS
    // ============================================================================

    /// Total number of HTTP requests handled by the shell
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("requests_total", "Total number of API requests"),
        &["endpoint", "status_code"],
        REGISTRY
    ).unwrap();

    /// Request duration histogram
    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("request_duration_seconds", "Request duration in seconds")
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["endpoint"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // COMPLETION METRICS
    // ============================================================================

    /// Individual OpenAI call attempts
    pub static ref COMPLETION_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("openai_calls_total", "Total OpenAI completion call attempts"),
        &["model", "outcome"], // outcome: success, failure
        REGISTRY
    ).unwrap();

    /// OpenAI call duration
    pub static ref COMPLETION_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("openai_call_duration_seconds", "OpenAI call duration")
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["model"],
        REGISTRY
    ).unwrap();

    /// User-initiated generation and edit cycles
    pub static ref CYCLES_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("cycles_total", "Total generation and edit cycles"),
        &["kind", "outcome"], // kind: create, reply, edit; outcome: ok, exhausted, timeout, ...
        REGISTRY
    ).unwrap();

    // ============================================================================
    // CACHE METRICS
    // ============================================================================

    /// Cache operations
    pub static ref CACHE_OPERATIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("cache_operations_total", "Total cache operations"),
        &["operation"], // operation: hit, miss, store, clear
        REGISTRY
    ).unwrap();

    /// Current cache entries
    pub static ref CACHE_ENTRIES: GaugeVec = register_gauge_vec_with_registry!(
        Opts::new("cache_entries_current", "Cached responses across all sessions"),
        &["type"], // type: active
        REGISTRY
    ).unwrap();

    // ============================================================================
    // SESSION METRICS
    // ============================================================================

    /// Open sessions
    pub static ref SESSIONS: GaugeVec = register_gauge_vec_with_registry!(
        Opts::new("sessions_current", "Number of open sessions"),
        &["state"], // state: open
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
