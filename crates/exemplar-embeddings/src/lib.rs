//! # exemplar-embeddings
//!
//! Text to fixed-length vectors. Providers: a deterministic hashed TF-IDF
//! model (always available) and an OpenAI-compatible HTTP API.
//! [`EmbeddingEngine`] wraps the selected provider with an L1 cache.

pub mod cache;
pub mod engine;
pub mod providers;
pub mod similarity;

pub use cache::L1MemoryCache;
pub use engine::{CacheStats, EmbeddingEngine};
pub use providers::{create_provider, ApiProvider, TfIdfFallback};
pub use similarity::cosine_similarity;
