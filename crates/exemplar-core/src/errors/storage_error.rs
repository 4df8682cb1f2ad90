use super::error_code::{self, ErrorCode};

/// Storage-layer errors for the durable vector store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("collection not found: {name}")]
    CollectionNotFound { name: String },

    #[error("entry {id} has {actual} dimensions, collection expects {expected}")]
    DimensionMismatch {
        id: usize,
        expected: usize,
        actual: usize,
    },

    #[error("store directory {path} unusable: {reason}")]
    StoreUnavailable { path: String, reason: String },
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::StoreUnavailable { .. } => error_code::STORE_UNAVAILABLE,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
