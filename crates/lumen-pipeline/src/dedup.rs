//! Bounded memory of recently dispatched event ids.

use std::collections::{HashSet, VecDeque};

use lumen_core::config::defaults::DEFAULT_DEDUP_CAPACITY;

/// Remembers the most recent `capacity` event ids, evicting the oldest.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    capacity: usize,
    order: VecDeque<String>,
    ids: HashSet<String>,
}

impl Deduplicator {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            ids: HashSet::with_capacity(capacity),
        }
    }

    /// True (and recorded) the first time an id is presented; false on repeat.
    pub fn seen(&mut self, event_id: &str) -> bool {
        if self.ids.contains(event_id) {
            return false;
        }
        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
        self.order.push_back(event_id.to_string());
        self.ids.insert(event_id.to_string());
        true
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.ids.contains(event_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_CAPACITY)
    }
}
