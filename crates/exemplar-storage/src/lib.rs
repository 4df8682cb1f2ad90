//! # exemplar-storage
//!
//! Durable vector collections in a single SQLite file under a store
//! directory. Each collection records the embedding model, dimensionality,
//! and corpus mtime it was built from; entries carry an f32 vector and
//! filterable metadata.

pub mod backup;
pub mod codec;
pub mod connection;
pub mod migrations;
pub mod vector_store;

pub use vector_store::{CollectionInfo, VectorEntry, VectorStore, STORE_FILE_NAME};
