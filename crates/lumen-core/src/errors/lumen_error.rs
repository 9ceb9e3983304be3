use super::{ConfigError, ExportError, SchemaError, StorageError, TransportError};

/// Top-level error for every fallible step inside the pipeline.
///
/// Public entry points never hand this to the host: they log it and carry on.
#[derive(Debug, thiserror::Error)]
pub enum LumenError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type LumenResult<T> = Result<T, LumenError>;
