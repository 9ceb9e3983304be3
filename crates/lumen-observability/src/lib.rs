//! # lumen-observability
//!
//! Structured tracing for the telemetry pipeline itself: subscriber setup,
//! span macros for dispatch and flush, named log events for every reliability
//! decision (drops, retries, breaker transitions), and counters surfaced in
//! the debug snapshot.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::{DeliveryMetrics, MetricsCollector, PipelineMetrics};
