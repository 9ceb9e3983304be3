//! Capped FIFO queues for the pre-consent and low-priority paths.

use std::collections::VecDeque;

use lumen_core::Event;
use lumen_observability::tracing_setup::events;

/// FIFO that drops its oldest entry when full.
#[derive(Debug, Clone)]
pub struct BoundedQueue {
    name: &'static str,
    capacity: usize,
    items: VecDeque<Event>,
}

impl BoundedQueue {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity: capacity.max(1),
            items: VecDeque::new(),
        }
    }

    /// Append an event. Returns true if the oldest entry was dropped to make room.
    pub fn push(&mut self, event: Event) -> bool {
        let overflowed = self.items.len() >= self.capacity;
        if overflowed {
            self.items.pop_front();
            events::queue_overflow(self.name, self.capacity);
        }
        self.items.push_back(event);
        overflowed
    }

    /// Remove everything, oldest first.
    pub fn drain(&mut self) -> Vec<Event> {
        self.items.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}
