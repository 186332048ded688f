// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    CACHE_ENTRIES,
    CACHE_OPERATIONS,
    COMPLETION_CALLS,
    COMPLETION_DURATION,
    CYCLES_TOTAL,
    REQUESTS_TOTAL,
    REQUEST_DURATION,
    SESSIONS,
};

/// Helper to record request metrics
pub fn record_request(endpoint: &str, status_code: u16, duration_secs: f64) {
    REQUESTS_TOTAL
        .with_label_values(&[endpoint, &status_code.to_string()])
        .inc();

    REQUEST_DURATION
        .with_label_values(&[endpoint])
        .observe(duration_secs);
}

/// Helper to record a single OpenAI call attempt
pub fn record_completion_call(model: &str, success: bool, duration_secs: f64) {
    let outcome = if success { "success" } else { "failure" };
    COMPLETION_CALLS.with_label_values(&[model, outcome]).inc();

    COMPLETION_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}

/// Helper to record the outcome of a whole generation or edit cycle
pub fn record_cycle(kind: &str, outcome: &str) {
    CYCLES_TOTAL.with_label_values(&[kind, outcome]).inc();
}

pub fn record_cache_hit() {
    CACHE_OPERATIONS.with_label_values(&["hit"]).inc();
}

pub fn record_cache_miss() {
    CACHE_OPERATIONS.with_label_values(&["miss"]).inc();
}

pub fn record_cache_store() {
    CACHE_OPERATIONS.with_label_values(&["store"]).inc();
}

pub fn record_cache_clear() {
    CACHE_OPERATIONS.with_label_values(&["clear"]).inc();
}

/// Entries are summed over every session cache, so callers report deltas
pub fn add_cache_entries(count: usize) {
    CACHE_ENTRIES.with_label_values(&["active"]).add(count as f64);
}

pub fn remove_cache_entries(count: usize) {
    if count > 0 {
        CACHE_ENTRIES.with_label_values(&["active"]).sub(count as f64);
    }
}

pub fn update_sessions(count: usize) {
    SESSIONS.with_label_values(&["open"]).set(count as f64);
}
