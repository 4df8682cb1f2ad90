pub mod example;
pub mod retrieval;
pub mod schema;
pub mod synthesis;

pub use example::{answer_block, AuxPrompt, Example};
pub use retrieval::{EntryMetadata, IndexStats, MetadataFilter, ScoredExample};
pub use schema::{Column, ForeignKey, Row, SchemaSnapshot, SemanticType, SqlValue, Table};
pub use synthesis::{SkipReason, SynthesisOutcome, SynthesisReport};
