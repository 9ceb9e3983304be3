//! Cutting the delivery queue into count/byte-capped batches.

use std::collections::VecDeque;

use lumen_core::constants::BATCH_ENVELOPE_BYTES;
use lumen_core::errors::TransportError;
use lumen_core::EnrichedEvent;

use crate::protocol::BatchEnvelope;

/// Remove the next batch from the front of `queue`.
///
/// Takes events in order while both caps hold. The first event is always
/// taken, even if it alone exceeds `max_bytes`, so an oversized event cannot
/// wedge the queue. Returns an empty batch only for an empty queue.
pub fn take_batch(
    queue: &mut VecDeque<EnrichedEvent>,
    max_events: usize,
    max_bytes: usize,
) -> Vec<EnrichedEvent> {
    let max_events = max_events.max(1);
    let mut batch = Vec::with_capacity(max_events.min(queue.len()));
    let mut bytes = BATCH_ENVELOPE_BYTES;

    while batch.len() < max_events {
        let Some(next) = queue.front() else {
            break;
        };
        let size = next.approx_size();
        if !batch.is_empty() && bytes + size > max_bytes {
            break;
        }
        bytes += size;
        if let Some(event) = queue.pop_front() {
            batch.push(event);
        }
    }
    batch
}

/// Put a failed batch back at the front of the queue, preserving its order.
pub fn requeue_front(queue: &mut VecDeque<EnrichedEvent>, batch: Vec<EnrichedEvent>) {
    for event in batch.into_iter().rev() {
        queue.push_front(event);
    }
}

/// Serialize a batch as `{"events":[...]}`.
pub fn encode_batch(events: &[EnrichedEvent]) -> Result<Vec<u8>, TransportError> {
    serde_json::to_vec(&BatchEnvelope { events }).map_err(|e| TransportError::Encode {
        reason: e.to_string(),
    })
}
