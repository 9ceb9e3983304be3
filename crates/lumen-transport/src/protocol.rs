//! Wire format: one JSON object per request, `{"events":[...]}`.

use lumen_core::EnrichedEvent;
use serde::{Deserialize, Serialize};

/// Borrowing request body, used when encoding a batch.
#[derive(Debug, Serialize)]
pub struct BatchEnvelope<'a> {
    pub events: &'a [EnrichedEvent],
}

/// Owned request body, as the collector reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchBody {
    pub events: Vec<EnrichedEvent>,
}

/// Content type sent with every batch.
pub const CONTENT_TYPE: &str = "application/json";
