use super::error_code::{self, ErrorCode};

/// Language-generation client errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("API key variable {env} is not set")]
    MissingApiKey { env: String },

    #[error("generation request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("generation returned an empty response")]
    EmptyResponse,

    #[error("generation gave up after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl ErrorCode for GenerationError {
    fn error_code(&self) -> &'static str {
        error_code::GENERATION_ERROR
    }
}
