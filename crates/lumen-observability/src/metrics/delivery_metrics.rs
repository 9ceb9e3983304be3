//! Batches sent, dropped, requeued; retries; breaker openings.

use serde::{Deserialize, Serialize};

/// Counters for backend delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryMetrics {
    pub batches_sent: u64,
    pub events_delivered: u64,
    pub batches_dropped: u64,
    pub events_dropped: u64,
    pub batches_requeued: u64,
    pub retries: u64,
    pub breaker_opens: u64,
    /// Flushes skipped because the breaker denied the attempt.
    pub breaker_rejections: u64,
}

impl DeliveryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_delivered(&mut self, events: usize) {
        self.batches_sent += 1;
        self.events_delivered += events as u64;
    }

    pub fn record_dropped(&mut self, events: usize) {
        self.batches_dropped += 1;
        self.events_dropped += events as u64;
    }
}
