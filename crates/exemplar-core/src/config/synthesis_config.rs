use serde::{Deserialize, Serialize};

use super::defaults;

/// Schema-graph synthesis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Row cap appended to every synthesized statement.
    pub row_limit: usize,
    /// Question used when generation fails or returns nothing.
    pub fallback_question: String,
    /// Overrides the `db_id` recorded on examples. Defaults to the database file stem.
    pub db_id: Option<String>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            row_limit: defaults::DEFAULT_ROW_LIMIT,
            fallback_question: defaults::DEFAULT_FALLBACK_QUESTION.to_string(),
            db_id: None,
        }
    }
}
