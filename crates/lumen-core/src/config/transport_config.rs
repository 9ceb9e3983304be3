use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Backend transport configuration.
///
/// Keys are snake_case in config files; the host's camelCase spellings are
/// accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Collector URL.
    pub endpoint: String,
    /// Whether dispatched events are queued for backend delivery at all.
    pub enabled: bool,
    /// Use keep-alive delivery on unload so the request can outlive the page.
    #[serde(alias = "useBeacon")]
    pub use_beacon: bool,
    /// Additional attempts after the first for transient failures.
    #[serde(alias = "maxRetries")]
    pub max_retries: u32,
    /// Backoff base; attempt `n` waits `base * 2^n`.
    #[serde(alias = "retryBaseDelayMs")]
    pub retry_base_delay_ms: u64,
    /// Consecutive failures that open the breaker.
    #[serde(alias = "circuitBreakerThreshold")]
    pub circuit_breaker_threshold: u32,
    /// How long the breaker stays open before a trial attempt.
    #[serde(alias = "circuitBreakerCooldownMs")]
    pub circuit_breaker_cooldown_ms: u64,
    /// Max events per batch.
    #[serde(alias = "batchSizeLimit")]
    pub batch_size_limit: usize,
    /// Approximate max serialized bytes per batch.
    #[serde(alias = "batchBytesLimit")]
    pub batch_bytes_limit: usize,
}

impl TransportConfig {
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn circuit_breaker_cooldown(&self) -> Duration {
        Duration::from_millis(self.circuit_breaker_cooldown_ms)
    }

    /// Apply a partial update; unset fields keep their current value.
    pub fn apply(&mut self, patch: &TransportConfigPatch) {
        if let Some(endpoint) = &patch.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(v) = patch.enabled {
            self.enabled = v;
        }
        if let Some(v) = patch.use_beacon {
            self.use_beacon = v;
        }
        if let Some(v) = patch.max_retries {
            self.max_retries = v;
        }
        if let Some(v) = patch.retry_base_delay_ms {
            self.retry_base_delay_ms = v;
        }
        if let Some(v) = patch.circuit_breaker_threshold {
            self.circuit_breaker_threshold = v.max(1);
        }
        if let Some(v) = patch.circuit_breaker_cooldown_ms {
            self.circuit_breaker_cooldown_ms = v;
        }
        if let Some(v) = patch.batch_size_limit {
            self.batch_size_limit = v.max(1);
        }
        if let Some(v) = patch.batch_bytes_limit {
            self.batch_bytes_limit = v.max(1);
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_ENDPOINT.to_string(),
            enabled: defaults::DEFAULT_TRANSPORT_ENABLED,
            use_beacon: defaults::DEFAULT_USE_BEACON,
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: defaults::DEFAULT_RETRY_BASE_DELAY_MS,
            circuit_breaker_threshold: defaults::DEFAULT_CIRCUIT_BREAKER_THRESHOLD,
            circuit_breaker_cooldown_ms: defaults::DEFAULT_CIRCUIT_BREAKER_COOLDOWN_MS,
            batch_size_limit: defaults::DEFAULT_BATCH_SIZE_LIMIT,
            batch_bytes_limit: defaults::DEFAULT_BATCH_BYTES_LIMIT,
        }
    }
}

/// Partial transport configuration, as passed to `configure_transport`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransportConfigPatch {
    pub endpoint: Option<String>,
    pub enabled: Option<bool>,
    #[serde(alias = "use_beacon")]
    pub use_beacon: Option<bool>,
    #[serde(alias = "max_retries")]
    pub max_retries: Option<u32>,
    #[serde(alias = "retry_base_delay_ms")]
    pub retry_base_delay_ms: Option<u64>,
    #[serde(alias = "circuit_breaker_threshold")]
    pub circuit_breaker_threshold: Option<u32>,
    #[serde(alias = "circuit_breaker_cooldown_ms")]
    pub circuit_breaker_cooldown_ms: Option<u64>,
    #[serde(alias = "batch_size_limit")]
    pub batch_size_limit: Option<usize>,
    #[serde(alias = "batch_bytes_limit")]
    pub batch_bytes_limit: Option<usize>,
}
