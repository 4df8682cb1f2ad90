//! # exemplar-corpus
//!
//! The ordered example corpus. An example's position is its id; deleting
//! one renumbers every later example and the auxiliary prompt maps.

pub mod extract;
pub mod file;
pub mod search;
pub mod store;
pub mod validate;

pub use extract::{extract_sql, sql_of};
pub use file::{load_examples, CorpusFile};
pub use search::{difficulty_distribution, search};
pub use store::{ExampleCorpus, SaveRequest};
pub use validate::{validate_corpus, CorpusIssue, IssueKind, ValidationReport};
