use super::error_code::{self, ErrorCode};

/// Embedding subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("provider unavailable: {provider}")]
    ProviderUnavailable { provider: String },
}

impl ErrorCode for EmbeddingError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable { .. } => error_code::PROVIDER_UNAVAILABLE,
            _ => error_code::EMBEDDING_ERROR,
        }
    }
}
