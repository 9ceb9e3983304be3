/// Lumen version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Storage key for the persisted consent decision.
pub const CONSENT_STORAGE_KEY: &str = "lumen.consent";

/// Storage key for the last successful backend flush (RFC 3339).
pub const LAST_FLUSH_STORAGE_KEY: &str = "lumen.last_flush";

/// Persisted value for a granted consent decision.
pub const CONSENT_GRANTED: &str = "granted";

/// Persisted value for a denied consent decision.
pub const CONSENT_DENIED: &str = "denied";

/// Placeholder written over redacted email addresses.
pub const EMAIL_PLACEHOLDER: &str = "[EMAIL]";

/// Bytes added per event for the JSON array separator when sizing batches.
pub const BATCH_SEPARATOR_BYTES: usize = 1;

/// Bytes of the `{"events":[]}` envelope when sizing batches.
pub const BATCH_ENVELOPE_BYTES: usize = 13;
