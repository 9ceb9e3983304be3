//! Central metrics registry.
//!
//! [`MetricsCollector`] owns the pipeline and delivery counters and is
//! serialized into the debug snapshot.

mod delivery_metrics;
mod pipeline_metrics;

pub use delivery_metrics::DeliveryMetrics;
pub use pipeline_metrics::PipelineMetrics;

/// Central metrics registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetricsCollector {
    pub pipeline: PipelineMetrics,
    pub delivery: DeliveryMetrics,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all metrics (useful for testing or periodic rotation).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
