/// Backend delivery errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {reason}")]
    Network { reason: String },

    #[error("HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("failed to encode batch: {reason}")]
    Encode { reason: String },
}

impl TransportError {
    /// Whether resubmitting the same batch could succeed.
    ///
    /// 4xx is permanent except 429, which the collector uses for rate limiting.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::HttpStatus { status } => *status == 429 || *status >= 500,
            Self::Encode { .. } => false,
        }
    }
}
