use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval engine construction parameters.
///
/// Corpus path, store path, collection and the embedding model together
/// reproduce a given index deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// "durable" or "ephemeral".
    pub backend: String,
    pub corpus_path: PathBuf,
    /// Directory of the durable vector store. Unused by the ephemeral backend.
    pub store_path: PathBuf,
    pub collection: String,
    pub default_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            backend: defaults::DEFAULT_RETRIEVAL_BACKEND.to_string(),
            corpus_path: PathBuf::from(defaults::DEFAULT_CORPUS_PATH),
            store_path: PathBuf::from(defaults::DEFAULT_STORE_PATH),
            collection: defaults::DEFAULT_COLLECTION.to_string(),
            default_k: defaults::DEFAULT_K,
        }
    }
}
