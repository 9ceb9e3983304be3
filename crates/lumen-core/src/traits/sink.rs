use crate::event::Event;

/// Where event sources send what they observe. Implemented by the pipeline.
pub trait IEventSink: Send + Sync {
    fn track(&self, event: Event);

    /// Record an event from a context that may already hold this sink's
    /// locks on the current thread, such as a panic hook. Must not block on
    /// them; implementations may hold the event back until the next `track`.
    fn track_nonblocking(&self, event: Event) {
        self.track(event);
    }
}
