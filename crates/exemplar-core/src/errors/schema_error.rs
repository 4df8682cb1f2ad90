use super::error_code::{self, ErrorCode};

/// Schema introspection and database capability errors.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("cannot open database {path}: {reason}")]
    OpenFailed { path: String, reason: String },

    #[error("introspection of {table} failed: {reason}")]
    IntrospectionFailed { table: String, reason: String },

    #[error("unknown table: {table}")]
    UnknownTable { table: String },

    #[error("SQL execution failed: {reason}")]
    ExecutionFailed { reason: String },
}

impl ErrorCode for SchemaError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTable { .. } => error_code::UNKNOWN_TABLE,
            _ => error_code::SCHEMA_ERROR,
        }
    }
}
