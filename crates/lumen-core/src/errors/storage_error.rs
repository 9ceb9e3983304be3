/// Host key/value storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed at {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("stored value for {key} is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}
