//! Structured log events for key pipeline decisions.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log an event rejected at the schema boundary.
pub fn event_rejected(category: &str, action: &str, reason: &str, dev_mode: bool) {
    if dev_mode {
        tracing::warn!(
            event = "event_rejected",
            category = %category,
            action = %action,
            reason = %reason,
            "telemetry event rejected"
        );
    } else {
        tracing::debug!(
            event = "event_rejected",
            category = %category,
            action = %action,
            reason = %reason,
            "telemetry event rejected"
        );
    }
}

/// Log an exporter failure. Never fatal.
pub fn exporter_failed(exporter: &str, error: &str, dev_mode: bool) {
    if dev_mode {
        tracing::warn!(
            event = "exporter_failed",
            exporter = %exporter,
            error = %error,
            "exporter failed"
        );
    } else {
        tracing::debug!(
            event = "exporter_failed",
            exporter = %exporter,
            error = %error,
            "exporter failed"
        );
    }
}

/// Log a queue dropping its oldest entry.
pub fn queue_overflow(queue: &str, capacity: usize) {
    tracing::warn!(
        event = "queue_overflow",
        queue = %queue,
        capacity = capacity,
        "queue full, dropped oldest event"
    );
}

/// Log a consent transition.
pub fn consent_changed(granted: bool) {
    tracing::info!(event = "consent_changed", granted = granted, "consent changed");
}

/// Log a successful batch delivery.
pub fn batch_delivered(events: usize, status: u16, attempts: u32) {
    tracing::info!(
        event = "batch_delivered",
        events = events,
        status = status,
        attempts = attempts,
        "batch delivered"
    );
}

/// Log a batch that will not be retried.
pub fn batch_dropped(events: usize, reason: &str) {
    tracing::warn!(
        event = "batch_dropped",
        events = events,
        reason = %reason,
        "batch dropped"
    );
}

/// Log a batch put back at the front of the delivery queue.
pub fn batch_requeued(events: usize) {
    tracing::warn!(
        event = "batch_requeued",
        events = events,
        "batch requeued after exhausting retries"
    );
}

/// Log a retry about to happen.
pub fn delivery_retry(attempt: u32, max_retries: u32, delay_ms: u64, error: &str) {
    tracing::debug!(
        event = "delivery_retry",
        attempt = attempt,
        max_retries = max_retries,
        delay_ms = delay_ms,
        error = %error,
        "retrying batch delivery"
    );
}

/// Log the breaker opening.
pub fn breaker_opened(failures: u32, cooldown_ms: u64) {
    tracing::warn!(
        event = "breaker_opened",
        failures = failures,
        cooldown_ms = cooldown_ms,
        "circuit breaker opened"
    );
}

/// Log the breaker closing after a successful trial.
pub fn breaker_closed() {
    tracing::info!(event = "breaker_closed", "circuit breaker closed");
}

/// Log a flush skipped because the breaker is open.
pub fn flush_skipped_breaker_open(queued: usize) {
    tracing::debug!(
        event = "flush_skipped",
        queued = queued,
        "flush skipped, circuit breaker open"
    );
}

/// Log a heartbeat starting.
pub fn heartbeat_started(interval_ms: u64) {
    tracing::debug!(
        event = "heartbeat_started",
        interval_ms = interval_ms,
        "heartbeat started"
    );
}

/// Log the panic hook being installed.
pub fn panic_hook_installed() {
    tracing::debug!(event = "panic_hook_installed", "panic hook installed");
}

/// Log a panic captured by the panic hook.
pub fn panic_captured(location: Option<&str>) {
    tracing::warn!(
        event = "panic_captured",
        location = location.unwrap_or("unknown"),
        "panic captured"
    );
}
