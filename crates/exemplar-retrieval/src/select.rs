//! Backend selection from configuration.

use exemplar_core::config::{EmbeddingConfig, RetrievalConfig};
use exemplar_core::errors::ExemplarResult;
use exemplar_core::traits::IExampleRetriever;
use exemplar_embeddings::EmbeddingEngine;
use tracing::{info, warn};

use crate::ephemeral::EphemeralRetriever;

/// Open the configured backend. Without the `durable` feature a durable
/// request degrades to the ephemeral backend; with it, construction errors
/// propagate.
pub fn open_retriever(
    retrieval: &RetrievalConfig,
    embedding: &EmbeddingConfig,
) -> ExemplarResult<Box<dyn IExampleRetriever>> {
    let engine = Box::new(EmbeddingEngine::new(embedding));
    match retrieval.backend.as_str() {
        "durable" => open_durable(retrieval, engine),
        "ephemeral" => {
            info!(corpus = %retrieval.corpus_path.display(), "opening ephemeral retriever");
            Ok(Box::new(EphemeralRetriever::open(&retrieval.corpus_path, engine)?))
        }
        other => {
            warn!(backend = other, "unknown retrieval backend, using ephemeral");
            Ok(Box::new(EphemeralRetriever::open(&retrieval.corpus_path, engine)?))
        }
    }
}

#[cfg(feature = "durable")]
fn open_durable(
    retrieval: &RetrievalConfig,
    engine: Box<EmbeddingEngine>,
) -> ExemplarResult<Box<dyn IExampleRetriever>> {
    info!(
        corpus = %retrieval.corpus_path.display(),
        store = %retrieval.store_path.display(),
        collection = %retrieval.collection,
        "opening durable retriever"
    );
    Ok(Box::new(crate::durable::DurableRetriever::open(
        &retrieval.corpus_path,
        &retrieval.store_path,
        &retrieval.collection,
        engine,
    )?))
}

#[cfg(not(feature = "durable"))]
fn open_durable(
    retrieval: &RetrievalConfig,
    engine: Box<EmbeddingEngine>,
) -> ExemplarResult<Box<dyn IExampleRetriever>> {
    warn!("durable backend not compiled in, falling back to ephemeral");
    Ok(Box::new(EphemeralRetriever::open(&retrieval.corpus_path, engine)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &std::path::Path, backend: &str) -> RetrievalConfig {
        let corpus = dir.join("questions.json");
        std::fs::write(
            &corpus,
            r#"{"questions": [{"question": "how many orders", "db_id": "shop", "prompt": "x"}]}"#,
        )
        .unwrap();
        RetrievalConfig {
            backend: backend.to_string(),
            corpus_path: corpus,
            store_path: dir.join(".vectordb"),
            ..RetrievalConfig::default()
        }
    }

    #[test]
    fn ephemeral_backend_selected() {
        let dir = tempfile::tempdir().unwrap();
        let r = open_retriever(&config(dir.path(), "ephemeral"), &EmbeddingConfig::default()).unwrap();
        assert_eq!(r.backend_name(), "ephemeral");
        assert_eq!(r.len(), 1);
    }

    #[cfg(feature = "durable")]
    #[test]
    fn durable_backend_selected() {
        let dir = tempfile::tempdir().unwrap();
        let r = open_retriever(&config(dir.path(), "durable"), &EmbeddingConfig::default()).unwrap();
        assert_eq!(r.backend_name(), "durable");
        assert!(dir.path().join(".vectordb").exists());
    }

    #[test]
    fn missing_corpus_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let retrieval = RetrievalConfig {
            backend: "ephemeral".to_string(),
            corpus_path: dir.path().join("absent.json"),
            ..RetrievalConfig::default()
        };
        assert!(open_retriever(&retrieval, &EmbeddingConfig::default()).is_err());
    }
}
