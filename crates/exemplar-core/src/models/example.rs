//! Few-shot example records as stored in the corpus file.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A question/SQL/prompt record. Identity is its position in the corpus.
///
/// Missing or `null` fields deserialize to empty strings so that a malformed
/// record still occupies its slot and never shifts the ids of later examples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Example {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub question: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub db_id: String,
    /// Schema description + question + SQL, or an equivalent combined prompt.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(rename = "SQL", default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Mirror of the positional id, rewritten on renumbering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<usize>,
    /// Fields written by other tools; preserved verbatim on save.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Example {
    pub fn new(question: impl Into<String>, db_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            db_id: db_id.into(),
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Whether the record carries SQL, either explicitly or inside its prompt.
    pub fn has_sql(&self) -> bool {
        self.sql.as_deref().is_some_and(|s| !s.trim().is_empty()) || !self.prompt.is_empty()
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The question header and SQL body that close every combined prompt.
pub fn answer_block(question: &str, sql: &str) -> String {
    format!("/* Answer the following question: {question} */\n{sql}")
}

/// Auxiliary per-id prompt variant (extraction-stage or parsing-stage).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxPrompt {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prompt: String,
}

impl AuxPrompt {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}
