//! In-memory backend: one embedding per corpus slot, cosine similarity.

use std::path::{Path, PathBuf};

use exemplar_core::errors::ExemplarResult;
use exemplar_core::models::ScoredExample;
use exemplar_core::traits::{IEmbeddingProvider, IExampleRetriever};
use exemplar_embeddings::cosine_similarity;
use tracing::{debug, info};

use crate::corpus_source::load_corpus;

pub const BACKEND_NAME: &str = "ephemeral";

/// Embeds every question once at construction. Empty or missing questions
/// still get a slot, so row `i` of the matrix is always corpus id `i`.
pub struct EphemeralRetriever {
    corpus_path: PathBuf,
    embedder: Box<dyn IEmbeddingProvider>,
    embeddings: Vec<Vec<f32>>,
}

impl EphemeralRetriever {
    pub fn open(corpus_path: &Path, embedder: Box<dyn IEmbeddingProvider>) -> ExemplarResult<Self> {
        let questions: Vec<String> = load_corpus(corpus_path)?
            .into_iter()
            .map(|e| e.question)
            .collect();
        let embeddings = if questions.is_empty() {
            Vec::new()
        } else {
            embedder.embed_batch(&questions)?
        };
        info!(
            corpus = %corpus_path.display(),
            examples = embeddings.len(),
            model = embedder.name(),
            "ephemeral index built"
        );
        Ok(Self {
            corpus_path: corpus_path.to_path_buf(),
            embedder,
            embeddings,
        })
    }

    pub fn corpus_path(&self) -> &Path {
        &self.corpus_path
    }
}

impl IExampleRetriever for EphemeralRetriever {
    fn retrieve_top_k(&mut self, query: &str, k: usize) -> ExemplarResult<Vec<ScoredExample>> {
        if self.embeddings.is_empty() {
            return Ok(vec![ScoredExample::sentinel()]);
        }
        let q = self.embedder.embed(query)?;
        let mut scored: Vec<ScoredExample> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(id, v)| ScoredExample::new(id, cosine_similarity(&q, v)))
            .collect();
        // Stable: equal scores keep ascending id order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        if let Some(best) = scored.first() {
            debug!(id = best.id, score = best.score, "ephemeral hit");
        }
        Ok(scored)
    }

    fn best_question_id(&mut self, query: &str) -> ExemplarResult<usize> {
        Ok(self
            .retrieve_top_k(query, 1)?
            .first()
            .map_or(0, |hit| hit.id))
    }

    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn len(&self) -> usize {
        self.embeddings.len()
    }
}
