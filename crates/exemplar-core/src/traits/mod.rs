//! Capability traits at the seams between crates.

pub mod database;
pub mod embedding;
pub mod question_generator;
pub mod retriever;

pub use database::IDatabase;
pub use embedding::IEmbeddingProvider;
pub use question_generator::IQuestionGenerator;
pub use retriever::IExampleRetriever;
