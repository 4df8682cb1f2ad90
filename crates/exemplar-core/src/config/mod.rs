//! Configuration system for exemplar.
//! TOML-based, layered: CLI > env > project file > defaults.

pub mod defaults;
pub mod embedding_config;
pub mod exemplar_config;
pub mod generation_config;
pub mod retrieval_config;
pub mod synthesis_config;

pub use embedding_config::EmbeddingConfig;
pub use exemplar_config::{CliOverrides, ExemplarConfig};
pub use generation_config::GenerationConfig;
pub use retrieval_config::RetrievalConfig;
pub use synthesis_config::SynthesisConfig;
