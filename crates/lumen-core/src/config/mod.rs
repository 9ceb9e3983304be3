pub mod defaults;
mod observability_config;
mod pipeline_config;
mod sampling_config;
mod transport_config;

pub use observability_config::ObservabilityConfig;
pub use pipeline_config::PipelineConfig;
pub use sampling_config::SamplingConfig;
pub use transport_config::{TransportConfig, TransportConfigPatch};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, LumenResult};

/// Top-level configuration, usually loaded from `lumen.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LumenConfig {
    pub transport: TransportConfig,
    pub sampling: SamplingConfig,
    pub pipeline: PipelineConfig,
    pub observability: ObservabilityConfig,
}

impl LumenConfig {
    /// Parse and validate a TOML document. Missing sections fall back to defaults.
    pub fn from_toml_str(source: &str) -> LumenResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> LumenResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.transport;
        if t.batch_size_limit == 0 {
            return Err(invalid("transport.batch_size_limit", "must be at least 1"));
        }
        if t.batch_bytes_limit == 0 {
            return Err(invalid("transport.batch_bytes_limit", "must be at least 1"));
        }
        if t.circuit_breaker_threshold == 0 {
            return Err(invalid(
                "transport.circuit_breaker_threshold",
                "must be at least 1",
            ));
        }
        if t.enabled && t.endpoint.trim().is_empty() {
            return Err(invalid("transport.endpoint", "required when enabled"));
        }
        for (category, rate) in &self.sampling.rates {
            if !(0.0..=1.0).contains(rate) {
                return Err(invalid(
                    &format!("sampling.rates.{category}"),
                    &format!("{rate} is outside [0, 1]"),
                ));
            }
        }
        let p = &self.pipeline;
        if p.dedup_capacity == 0 {
            return Err(invalid("pipeline.dedup_capacity", "must be at least 1"));
        }
        if p.max_queue_len == 0 {
            return Err(invalid("pipeline.max_queue_len", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&p.section_visibility_threshold) {
            return Err(invalid(
                "pipeline.section_visibility_threshold",
                "must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
