//! Error handling for exemplar.
//! One error enum per subsystem, `thiserror` only, aggregated by [`ExemplarError`].

pub mod config_error;
pub mod corpus_error;
pub mod embedding_error;
pub mod error_code;
pub mod generation_error;
pub mod retrieval_error;
pub mod schema_error;
pub mod storage_error;
pub mod synthesis_error;

pub use config_error::ConfigError;
pub use corpus_error::CorpusError;
pub use embedding_error::EmbeddingError;
pub use error_code::ErrorCode;
pub use generation_error::GenerationError;
pub use retrieval_error::RetrievalError;
pub use schema_error::SchemaError;
pub use storage_error::StorageError;
pub use synthesis_error::SynthesisError;

/// Workspace-wide error. Subsystem errors convert into it via `From`.
#[derive(Debug, thiserror::Error)]
pub enum ExemplarError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ErrorCode for ExemplarError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Schema(e) => e.error_code(),
            Self::Synthesis(e) => e.error_code(),
            Self::Corpus(e) => e.error_code(),
            Self::Embedding(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Retrieval(e) => e.error_code(),
            Self::Generation(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

/// Convenience alias used across the workspace.
pub type ExemplarResult<T> = Result<T, ExemplarError>;
