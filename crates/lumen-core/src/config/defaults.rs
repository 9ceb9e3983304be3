// Single source of truth for all default values.

// --- Transport ---
pub const DEFAULT_ENDPOINT: &str = "/api/telemetry";
pub const DEFAULT_TRANSPORT_ENABLED: bool = false;
pub const DEFAULT_USE_BEACON: bool = true;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1_000;
pub const DEFAULT_CIRCUIT_BREAKER_THRESHOLD: u32 = 5;
pub const DEFAULT_CIRCUIT_BREAKER_COOLDOWN_MS: u64 = 60_000;
pub const DEFAULT_BATCH_SIZE_LIMIT: usize = 20;
pub const DEFAULT_BATCH_BYTES_LIMIT: usize = 60_000;

// --- Sampling ---
pub const DEFAULT_HEARTBEAT_SAMPLE_RATE: f64 = 0.5;

// --- Pipeline ---
pub const DEFAULT_MAX_QUEUE_LEN: usize = 1_000;
pub const DEFAULT_DEDUP_CAPACITY: usize = 200;
pub const DEFAULT_IDLE_FLUSH_TIMEOUT_MS: u64 = 4_000;
pub const DEFAULT_BACKEND_FLUSH_DELAY_MS: u64 = 1_000;
pub const DEFAULT_HEARTBEAT_INTERVAL_MS: u64 = 30_000;
pub const DEFAULT_SECTION_VISIBILITY_THRESHOLD: f64 = 0.35;
pub const DEFAULT_CLS_INPUT_EXCLUSION_MS: u64 = 500;
pub const DEFAULT_DEV_MODE: bool = false;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
