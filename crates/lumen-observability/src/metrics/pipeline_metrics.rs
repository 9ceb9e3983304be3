//! Tracked, dispatched, rejected, sampled-out, duplicate and exporter-failure counts.

use serde::{Deserialize, Serialize};

/// Counters for the synchronous dispatch path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineMetrics {
    /// Calls to `track`, including ones that were queued.
    pub tracked: u64,
    /// Events that passed validation, sampling and dedup.
    pub dispatched: u64,
    /// Schema rejections.
    pub rejected: u64,
    /// Events dropped by the sampler.
    pub sampled_out: u64,
    /// Events dropped as duplicates.
    pub duplicates: u64,
    /// Individual exporter calls that failed or panicked.
    pub exporter_failures: u64,
    /// Events dropped because a queue was full.
    pub queue_overflows: u64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of tracked events that made it through dispatch.
    pub fn dispatch_ratio(&self) -> f64 {
        if self.tracked == 0 {
            return 0.0;
        }
        self.dispatched as f64 / self.tracked as f64
    }
}
