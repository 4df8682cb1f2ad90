use super::error_code::{self, ErrorCode};

/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("corpus {path} unreadable: {reason}")]
    CorpusUnreadable { path: String, reason: String },

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },
}

impl ErrorCode for RetrievalError {
    fn error_code(&self) -> &'static str {
        error_code::RETRIEVAL_ERROR
    }
}
