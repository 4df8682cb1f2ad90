use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding provider: "tfidf" or "api".
    pub provider: String,
    /// Model identifier. Recorded on durable collections.
    pub model: String,
    pub dimensions: usize,
    /// HTTP endpoint for "api". Provider default when unset.
    pub endpoint: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// L1 in-memory cache max entries.
    pub l1_cache_size: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            endpoint: None,
            api_key_env: defaults::DEFAULT_API_KEY_ENV.to_string(),
            l1_cache_size: defaults::DEFAULT_L1_CACHE_SIZE,
        }
    }
}
