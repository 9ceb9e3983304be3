use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{Action, Category, Metadata, Priority};
use crate::constants::BATCH_SEPARATOR_BYTES;

/// An event after validation, sampling, dedup and metadata sanitization.
/// This is the shape exporters receive and the collector ingests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedEvent {
    pub event_id: String,
    pub session_id: String,
    pub event_category: Category,
    pub event_action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub priority: Priority,
    pub timestamp: DateTime<Utc>,
}

impl EnrichedEvent {
    /// Approximate serialized size in bytes, including the array separator.
    pub fn approx_size(&self) -> usize {
        serde_json::to_vec(self)
            .map(|bytes| bytes.len())
            .unwrap_or(0)
            + BATCH_SEPARATOR_BYTES
    }
}
