use serde::{Deserialize, Serialize};

use super::defaults;

/// Queueing, dedup, scheduling and event-source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Cap per queue; the oldest entry is dropped on overflow.
    pub max_queue_len: usize,
    /// Number of recent event ids remembered by the deduplicator.
    pub dedup_capacity: usize,
    /// Delay before the low-priority queue is drained.
    pub idle_flush_timeout_ms: u64,
    /// Delay before a backend flush after an event is enqueued.
    pub backend_flush_delay_ms: u64,
    /// Heartbeat tick interval.
    pub heartbeat_interval_ms: u64,
    /// Visible ratio at which a section counts as viewed.
    pub section_visibility_threshold: f64,
    /// Layout shifts this soon after input are excluded from CLS.
    pub cls_input_exclusion_ms: u64,
    /// Metadata keys whose string values are never redacted.
    pub metadata_whitelist: Vec<String>,
    /// Surface schema rejections and exporter failures as warnings.
    pub dev_mode: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_queue_len: defaults::DEFAULT_MAX_QUEUE_LEN,
            dedup_capacity: defaults::DEFAULT_DEDUP_CAPACITY,
            idle_flush_timeout_ms: defaults::DEFAULT_IDLE_FLUSH_TIMEOUT_MS,
            backend_flush_delay_ms: defaults::DEFAULT_BACKEND_FLUSH_DELAY_MS,
            heartbeat_interval_ms: defaults::DEFAULT_HEARTBEAT_INTERVAL_MS,
            section_visibility_threshold: defaults::DEFAULT_SECTION_VISIBILITY_THRESHOLD,
            cls_input_exclusion_ms: defaults::DEFAULT_CLS_INPUT_EXCLUSION_MS,
            metadata_whitelist: vec!["contact_email".to_string()],
            dev_mode: defaults::DEFAULT_DEV_MODE,
        }
    }
}
