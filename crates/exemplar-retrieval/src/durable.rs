//! Persistent backend over a named [`VectorStore`] collection.
//!
//! The collection records the corpus mtime it was built from together with
//! the embedding model identity and dimensionality. It is stale when the
//! corpus file is newer or the model differs, and a stale collection is
//! rebuilt from scratch. Only [`IExampleRetriever::best_question_id`]
//! re-checks freshness; direct top-k calls serve whatever was last built.

use std::path::{Path, PathBuf};

use exemplar_core::errors::{ExemplarResult, RetrievalError, StorageError};
use exemplar_core::models::{EntryMetadata, Example, IndexStats, MetadataFilter, ScoredExample};
use exemplar_core::traits::{IEmbeddingProvider, IExampleRetriever};
use exemplar_embeddings::similarity::distance_to_similarity;
use exemplar_storage::{CollectionInfo, VectorEntry, VectorStore};
use tracing::{debug, info};

use crate::corpus_source::{corpus_mtime, load_corpus};

pub const BACKEND_NAME: &str = "durable";

pub struct DurableRetriever {
    corpus_path: PathBuf,
    store_path: PathBuf,
    collection: String,
    store: VectorStore,
    embedder: Box<dyn IEmbeddingProvider>,
}

impl DurableRetriever {
    /// Open the store under `store_path`, rebuilding `collection` if stale.
    pub fn open(
        corpus_path: &Path,
        store_path: &Path,
        collection: &str,
        embedder: Box<dyn IEmbeddingProvider>,
    ) -> ExemplarResult<Self> {
        let store = VectorStore::open(store_path)?;
        let mut retriever = Self {
            corpus_path: corpus_path.to_path_buf(),
            store_path: store_path.to_path_buf(),
            collection: collection.to_string(),
            store,
            embedder,
        };
        retriever.ensure_fresh()?;
        Ok(retriever)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Whether the collection must be rebuilt before it reflects the corpus.
    pub fn is_stale(&self) -> ExemplarResult<bool> {
        let Some(info) = self.store.collection(&self.collection)? else {
            return Ok(true);
        };
        let mtime = corpus_mtime(&self.corpus_path)?;
        Ok(mtime > info.last_update
            || info.embedding_model != self.embedder.name()
            || info.dimensions != self.embedder.dimensions())
    }

    /// Rebuild if stale. Returns whether a rebuild happened.
    pub fn ensure_fresh(&mut self) -> ExemplarResult<bool> {
        if self.is_stale()? {
            self.rebuild()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Re-embed every non-empty question and swap the collection in one step.
    pub fn rebuild(&mut self) -> ExemplarResult<()> {
        let mtime = corpus_mtime(&self.corpus_path)?;
        let examples = load_corpus(&self.corpus_path)?;

        let kept: Vec<(usize, &Example)> = examples
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.question.is_empty())
            .collect();
        let questions: Vec<String> = kept.iter().map(|(_, e)| e.question.clone()).collect();
        let embeddings = if questions.is_empty() {
            Vec::new()
        } else {
            self.embedder.embed_batch(&questions)?
        };

        let entries: Vec<VectorEntry> = kept
            .iter()
            .zip(embeddings)
            .map(|((id, example), embedding)| VectorEntry {
                id: *id,
                embedding,
                metadata: EntryMetadata {
                    db_id: example.db_id.clone(),
                    difficulty: example.difficulty.clone(),
                    has_sql: example.has_sql(),
                },
            })
            .collect();

        let info = CollectionInfo {
            name: self.collection.clone(),
            embedding_model: self.embedder.name().to_string(),
            dimensions: self.embedder.dimensions(),
            last_update: mtime,
        };
        self.store.replace_collection(&info, &entries)?;

        info!(
            collection = %self.collection,
            examples = entries.len(),
            skipped = examples.len() - entries.len(),
            model = self.embedder.name(),
            "collection rebuilt"
        );
        Ok(())
    }

    /// Forced rebuild regardless of freshness.
    pub fn reset(&mut self) -> ExemplarResult<()> {
        self.rebuild()
    }

    /// Top-k restricted to entries whose metadata matches `filter`.
    pub fn retrieve_top_k_filtered(
        &mut self,
        query: &str,
        k: usize,
        filter: &MetadataFilter,
    ) -> ExemplarResult<Vec<ScoredExample>> {
        let q = self.embedder.embed(query)?;
        let hits = self
            .store
            .query(&self.collection, &q, k, filter)
            .map_err(|e| RetrievalError::SearchFailed {
                reason: e.to_string(),
            })?;
        if hits.is_empty() {
            return Ok(if k == 0 {
                Vec::new()
            } else {
                vec![ScoredExample::sentinel()]
            });
        }
        let scored: Vec<ScoredExample> = hits
            .into_iter()
            .map(|(id, distance)| ScoredExample::new(id, distance_to_similarity(distance)))
            .collect();
        debug!(id = scored[0].id, score = scored[0].score, "durable hit");
        Ok(scored)
    }

    pub fn stats(&self) -> ExemplarResult<IndexStats> {
        let info = self
            .store
            .collection(&self.collection)?
            .ok_or_else(|| StorageError::CollectionNotFound {
                name: self.collection.clone(),
            })?;
        Ok(IndexStats {
            collection_name: info.name,
            total_examples: self.store.count(&self.collection)?,
            embedding_model: info.embedding_model,
            dimensions: info.dimensions,
            last_update: info.last_update,
        })
    }

    /// Remove a store directory and everything in it. Missing is fine.
    pub fn clean(store_path: &Path) -> ExemplarResult<bool> {
        if !store_path.exists() {
            return Ok(false);
        }
        std::fs::remove_dir_all(store_path).map_err(|e| {
            StorageError::StoreUnavailable {
                path: store_path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        info!(path = %store_path.display(), "vector store removed");
        Ok(true)
    }

    /// Snapshot the store under `store_path` into the file `dest`.
    pub fn backup(store_path: &Path, dest: &Path) -> ExemplarResult<()> {
        VectorStore::open(store_path)?.backup_to(dest)?;
        Ok(())
    }

    /// Replace the store under `store_path` with the snapshot at `src`,
    /// creating the store if it was cleaned. A restored collection older than
    /// the corpus is rebuilt on the next freshness check.
    pub fn restore(store_path: &Path, src: &Path) -> ExemplarResult<()> {
        VectorStore::open(store_path)?.restore_from(src)?;
        Ok(())
    }
}

impl IExampleRetriever for DurableRetriever {
    fn retrieve_top_k(&mut self, query: &str, k: usize) -> ExemplarResult<Vec<ScoredExample>> {
        self.retrieve_top_k_filtered(query, k, &MetadataFilter::default())
    }

    fn best_question_id(&mut self, query: &str) -> ExemplarResult<usize> {
        self.ensure_fresh()?;
        Ok(self
            .retrieve_top_k(query, 1)?
            .first()
            .map_or(0, |hit| hit.id))
    }

    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn len(&self) -> usize {
        self.store.count(&self.collection).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exemplar_embeddings::TfIdfFallback;

    fn write_corpus(path: &Path, rows: &[(&str, Option<&str>)]) {
        let qs: Vec<_> = rows
            .iter()
            .map(|(q, d)| {
                let mut v = serde_json::json!({"question": q, "db_id": "shop", "prompt": "SELECT 1"});
                if let Some(d) = d {
                    v["difficulty"] = serde_json::json!(d);
                }
                v
            })
            .collect();
        std::fs::write(path, serde_json::json!({"questions": qs}).to_string()).unwrap();
    }

    fn open(dir: &Path, dims: usize) -> DurableRetriever {
        DurableRetriever::open(
            &dir.join("questions.json"),
            &dir.join(".vectordb"),
            "fewshot_examples",
            Box::new(TfIdfFallback::new(dims)),
        )
        .unwrap()
    }

    #[test]
    fn empty_questions_are_not_indexed() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(
            &dir.path().join("questions.json"),
            &[("", None), ("list all products", None)],
        );
        let mut r = open(dir.path(), 128);
        assert_eq!(r.len(), 1);
        assert_eq!(r.best_question_id("products").unwrap(), 1);
    }

    #[test]
    fn filter_restricts_hits() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(
            &dir.path().join("questions.json"),
            &[("count orders", Some("simple")), ("count orders by month", Some("moderate"))],
        );
        let mut r = open(dir.path(), 128);
        let hits = r
            .retrieve_top_k_filtered("count orders", 5, &MetadataFilter::difficulty("moderate"))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        let none = r
            .retrieve_top_k_filtered("count orders", 5, &MetadataFilter::difficulty("hard"))
            .unwrap();
        assert_eq!(none, vec![ScoredExample::sentinel()]);
    }

    #[test]
    fn model_change_marks_collection_stale() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(&dir.path().join("questions.json"), &[("a question", None)]);
        drop(open(dir.path(), 64));
        let r = open(dir.path(), 64);
        assert!(!r.is_stale().unwrap());

        let r = DurableRetriever {
            embedder: Box::new(TfIdfFallback::new(32)),
            ..r
        };
        assert!(r.is_stale().unwrap());
    }

    #[test]
    fn stats_and_clean() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(&dir.path().join("questions.json"), &[("q one", None), ("q two", None)]);
        let r = open(dir.path(), 64);
        let stats = r.stats().unwrap();
        assert_eq!(stats.total_examples, 2);
        assert_eq!(stats.embedding_model, "tfidf-64");
        assert_eq!(stats.collection_name, "fewshot_examples");
        assert!(stats.last_update_utc().is_some());
        drop(r);

        assert!(DurableRetriever::clean(&dir.path().join(".vectordb")).unwrap());
        assert!(!DurableRetriever::clean(&dir.path().join(".vectordb")).unwrap());
    }
    #[test]
    fn cleaned_store_comes_back_from_backup() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(&dir.path().join("questions.json"), &[("q one", None), ("q two", None)]);
        let store = dir.path().join(".vectordb");
        let snapshot = dir.path().join("vectordb-backup.db");
        let before = open(dir.path(), 64).stats().unwrap();

        DurableRetriever::backup(&store, &snapshot).unwrap();
        assert!(DurableRetriever::clean(&store).unwrap());
        DurableRetriever::restore(&store, &snapshot).unwrap();

        let r = open(dir.path(), 64);
        assert!(!r.is_stale().unwrap());
        assert_eq!(r.stats().unwrap(), before);
    }
}
