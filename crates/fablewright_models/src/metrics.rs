//! OpenTelemetry metrics for provider calls.
//!
//! Instruments are registered against the global meter. Without an installed
//! meter provider they are no-ops.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::OnceLock;

static METRICS: OnceLock<LlmMetrics> = OnceLock::new();

/// Request, error and latency instruments labeled by provider and operation.
#[derive(Clone)]
pub struct LlmMetrics {
    _meter: Meter,
    /// Successful provider calls
    pub requests: Counter<u64>,
    /// Failed provider calls
    pub errors: Counter<u64>,
    /// Provider call duration in seconds
    pub duration: Histogram<f64>,
}

impl LlmMetrics {
    fn init() -> Self {
        let meter = global::meter("fablewright_llm");

        Self {
            _meter: meter.clone(),
            requests: meter
                .u64_counter("llm.requests")
                .with_description("Successful provider calls")
                .build(),
            errors: meter
                .u64_counter("llm.errors")
                .with_description("Failed provider calls")
                .build(),
            duration: meter
                .f64_histogram("llm.duration")
                .with_unit("seconds")
                .with_description("Provider call duration")
                .build(),
        }
    }

    /// Get the global metrics instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record a successful call.
    pub fn record_request(&self, provider: &str, operation: &str, duration_secs: f64) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("operation", operation.to_string()),
        ];
        self.requests.add(1, labels);
        self.duration.record(duration_secs, labels);
    }

    /// Record a failed call, labeled with the error kind.
    pub fn record_error(&self, provider: &str, operation: &str, error_type: &str) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("operation", operation.to_string()),
            KeyValue::new("error_type", error_type.to_string()),
        ];
        self.errors.add(1, labels);
    }
}

impl Default for LlmMetrics {
    fn default() -> Self {
        Self::get().clone()
    }
}

impl std::fmt::Debug for LlmMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmMetrics").finish_non_exhaustive()
    }
}
