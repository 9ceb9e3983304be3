//! Span definitions per operation: dispatch, backend flush, delivery attempt.

/// Create a dispatch span.
#[macro_export]
macro_rules! dispatch_span {
    ($category:expr, $action:expr) => {
        tracing::debug_span!("lumen.dispatch", category = %$category, action = %$action)
    };
}

/// Create a backend flush span.
#[macro_export]
macro_rules! flush_span {
    ($queued:expr, $force:expr) => {
        tracing::info_span!("lumen.flush", queued = $queued, force = $force)
    };
}

/// Create a delivery attempt span.
#[macro_export]
macro_rules! delivery_span {
    ($batch_len:expr, $attempt:expr) => {
        tracing::debug_span!("lumen.delivery", batch_len = $batch_len, attempt = $attempt)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const DISPATCH: &str = "lumen.dispatch";
    pub const FLUSH: &str = "lumen.flush";
    pub const DELIVERY: &str = "lumen.delivery";
}
