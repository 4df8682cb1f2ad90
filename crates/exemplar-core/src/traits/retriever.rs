use crate::errors::ExemplarResult;
use crate::models::ScoredExample;

/// Nearest-example lookup over a corpus of questions.
///
/// Both operations are best-effort over an empty corpus: they return the
/// sentinel `(0, 0.0)` rather than an error. Scores are higher-is-better
/// and only comparable within one backend.
pub trait IExampleRetriever: Send {
    /// Up to `k` examples, best first, scores non-increasing.
    fn retrieve_top_k(&mut self, query: &str, k: usize) -> ExemplarResult<Vec<ScoredExample>>;

    /// Id of the single best example; `0` when the corpus is empty.
    fn best_question_id(&mut self, query: &str) -> ExemplarResult<usize>;

    fn backend_name(&self) -> &'static str;

    /// Number of indexed examples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
