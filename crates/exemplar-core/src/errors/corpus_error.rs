use super::error_code::{self, ErrorCode};

/// Example corpus file and CRUD errors.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("corpus I/O failed for {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("corpus parse error in {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("example #{id} does not exist (corpus has {len} examples)")]
    IdOutOfRange { id: usize, len: usize },
}

impl ErrorCode for CorpusError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::IdOutOfRange { .. } => error_code::CORPUS_ID_OUT_OF_RANGE,
            _ => error_code::CORPUS_ERROR,
        }
    }
}
