//! Retrieval results, per-entry metadata, and index statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{SENTINEL_EXAMPLE_ID, SENTINEL_SCORE};

/// An example id with its similarity to the query. Higher is better,
/// roughly in `0..=1`; scores are only comparable within one backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredExample {
    pub id: usize,
    pub score: f64,
}

impl ScoredExample {
    pub fn new(id: usize, score: f64) -> Self {
        Self { id, score }
    }

    /// The safe default returned when no index or no corpus is available.
    pub fn sentinel() -> Self {
        Self::new(SENTINEL_EXAMPLE_ID, SENTINEL_SCORE)
    }
}

/// Metadata attached to each durable index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub db_id: String,
    pub difficulty: Option<String>,
    pub has_sql: bool,
}

/// Equality filter over [`EntryMetadata`]. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFilter {
    pub db_id: Option<String>,
    pub difficulty: Option<String>,
    pub has_sql: Option<bool>,
}

impl MetadataFilter {
    pub fn difficulty(value: impl Into<String>) -> Self {
        Self {
            difficulty: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn db_id(value: impl Into<String>) -> Self {
        Self {
            db_id: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.db_id.is_none() && self.difficulty.is_none() && self.has_sql.is_none()
    }

    pub fn matches(&self, meta: &EntryMetadata) -> bool {
        if let Some(ref db_id) = self.db_id {
            if &meta.db_id != db_id {
                return false;
            }
        }
        if let Some(ref difficulty) = self.difficulty {
            if meta.difficulty.as_ref() != Some(difficulty) {
                return false;
            }
        }
        if let Some(has_sql) = self.has_sql {
            if meta.has_sql != has_sql {
                return false;
            }
        }
        true
    }
}

/// Snapshot of a durable collection's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub collection_name: String,
    pub total_examples: usize,
    pub embedding_model: String,
    pub dimensions: usize,
    /// Corpus mtime (seconds since the epoch) recorded at the last build.
    pub last_update: f64,
}

impl IndexStats {
    pub fn last_update_utc(&self) -> Option<DateTime<Utc>> {
        let secs = self.last_update.trunc() as i64;
        let nanos = (self.last_update.fract() * 1e9) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}
