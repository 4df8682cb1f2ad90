//! # exemplar-core
//!
//! Foundation crate for the exemplar few-shot toolkit.
//! Defines the schema/example/retrieval models, capability traits,
//! errors, config, constants, and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod tracing_setup;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::ExemplarConfig;
pub use errors::{ExemplarError, ExemplarResult};
pub use models::{Example, ScoredExample, SemanticType, SqlValue, Table};
pub use tracing_setup::init_tracing;
