use super::error_code::{self, ErrorCode};
use super::schema_error::SchemaError;

/// Infrastructure failures during a synthesis run.
///
/// A candidate that fails validation is not an error; it surfaces as
/// `SynthesisOutcome::Skipped`.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("root table not in schema: {table}")]
    RootNotFound { table: String },

    #[error("schema unavailable: {0}")]
    Schema(#[from] SchemaError),
}

impl ErrorCode for SynthesisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::RootNotFound { .. } => error_code::UNKNOWN_TABLE,
            Self::Schema(e) => e.error_code(),
        }
    }
}
