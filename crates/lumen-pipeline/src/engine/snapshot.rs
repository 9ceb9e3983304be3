use std::collections::BTreeMap;

use lumen_core::Category;
use lumen_observability::MetricsCollector;
use lumen_transport::TransportSnapshot;
use serde::{Deserialize, Serialize};

/// Point-in-time view of the pipeline for debugging and host dev tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugSnapshot {
    pub session_id: String,
    pub consent: bool,
    pub pre_consent_queued: usize,
    pub low_priority_queued: usize,
    pub dedup_size: usize,
    /// Effective sampling rates; categories not listed are kept at 1.0.
    pub sampling: BTreeMap<Category, f64>,
    pub exporters: Vec<String>,
    pub transport: TransportSnapshot,
    pub metrics: MetricsCollector,
}

impl DebugSnapshot {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
