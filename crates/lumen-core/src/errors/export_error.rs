/// Best-effort exporter failures. Always isolated per exporter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("exporter {exporter} failed: {reason}")]
    Failed { exporter: String, reason: String },

    #[error("exporter {exporter} panicked")]
    Panicked { exporter: String },
}
