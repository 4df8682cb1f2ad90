//! # exemplar-schema
//!
//! Turns a database's declared foreign keys into executable example queries:
//! introspection, join graph, BFS join plan, SQL synthesis, validation,
//! question generation, and the per-table synthesis pipeline.

pub mod describe;
pub mod graph;
pub mod introspect;
pub mod pipeline;
pub mod planner;
pub mod question;
pub mod sqlite;
pub mod synthesizer;
pub mod validator;

pub use graph::{JoinEdge, JoinGraph};
pub use introspect::introspect;
pub use pipeline::SchemaSynthesizer;
pub use planner::{JoinPlan, PlannedJoin};
pub use sqlite::SqliteDatabase;
pub use synthesizer::synthesize_sql;
