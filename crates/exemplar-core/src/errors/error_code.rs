//! Stable, machine-readable error codes.

/// Every error enum maps its variants to a code string so callers
/// (the CLI, log pipelines) can match on something other than prose.
pub trait ErrorCode {
    /// Returns the code string (e.g., "SCHEMA_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SCHEMA_ERROR: &str = "SCHEMA_ERROR";
pub const UNKNOWN_TABLE: &str = "UNKNOWN_TABLE";
pub const CORPUS_ERROR: &str = "CORPUS_ERROR";
pub const CORPUS_ID_OUT_OF_RANGE: &str = "CORPUS_ID_OUT_OF_RANGE";
pub const EMBEDDING_ERROR: &str = "EMBEDDING_ERROR";
pub const PROVIDER_UNAVAILABLE: &str = "PROVIDER_UNAVAILABLE";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const RETRIEVAL_ERROR: &str = "RETRIEVAL_ERROR";
pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
pub const GENERATION_ERROR: &str = "GENERATION_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
