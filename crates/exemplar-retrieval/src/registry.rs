//! Process-wide sharing of open retrievers.
//!
//! Entries are keyed by (corpus path, store path, collection) and never
//! invalidated: a configuration change under the same key needs a new
//! registry (or process) to take effect.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use exemplar_core::config::{EmbeddingConfig, RetrievalConfig};
use exemplar_core::errors::ExemplarResult;
use exemplar_core::traits::IExampleRetriever;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::select::open_retriever;

pub type SharedRetriever = Arc<Mutex<Box<dyn IExampleRetriever>>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryKey {
    pub corpus_path: PathBuf,
    pub store_path: PathBuf,
    pub collection: String,
}

impl RegistryKey {
    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self {
            corpus_path: config.corpus_path.clone(),
            store_path: config.store_path.clone(),
            collection: config.collection.clone(),
        }
    }
}

#[derive(Default)]
pub struct RetrieverRegistry {
    open: Mutex<FxHashMap<RegistryKey, SharedRetriever>>,
}

impl RetrieverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The retriever for this configuration, opening it on first use.
    ///
    /// The registry lock is held while a backend is being built, so two
    /// callers racing on the same key never build it twice.
    pub fn get_or_open(
        &self,
        retrieval: &RetrievalConfig,
        embedding: &EmbeddingConfig,
    ) -> ExemplarResult<SharedRetriever> {
        let key = RegistryKey::from_config(retrieval);
        let mut open = self.lock();
        if let Some(existing) = open.get(&key) {
            debug!(collection = %key.collection, "reusing open retriever");
            return Ok(Arc::clone(existing));
        }
        let retriever: SharedRetriever = Arc::new(Mutex::new(open_retriever(retrieval, embedding)?));
        open.insert(key, Arc::clone(&retriever));
        Ok(retriever)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every open retriever.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, FxHashMap<RegistryKey, SharedRetriever>> {
        // A panic while opening leaves the map itself consistent.
        self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_reuses_instance() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("questions.json");
        std::fs::write(&corpus, r#"{"questions": [{"question": "q"}]}"#).unwrap();
        let retrieval = RetrievalConfig {
            backend: "ephemeral".to_string(),
            corpus_path: corpus,
            ..RetrievalConfig::default()
        };
        let registry = RetrieverRegistry::new();
        let a = registry.get_or_open(&retrieval, &EmbeddingConfig::default()).unwrap();
        let b = registry.get_or_open(&retrieval, &EmbeddingConfig::default()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);

        let other = RetrievalConfig {
            collection: "other".to_string(),
            ..retrieval
        };
        let c = registry.get_or_open(&other, &EmbeddingConfig::default()).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.len(), 2);

        registry.clear();
        assert!(registry.is_empty());
    }
}
