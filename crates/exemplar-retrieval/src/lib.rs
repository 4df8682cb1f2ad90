//! # exemplar-retrieval
//!
//! "Which stored example is closest to this question?"
//!
//! Two backends implement [`IExampleRetriever`](exemplar_core::traits::IExampleRetriever):
//! [`EphemeralRetriever`] keeps the corpus embeddings in memory for the
//! process lifetime; [`DurableRetriever`] (feature `durable`) persists them
//! in a named collection and rebuilds it when the corpus changes.
//! [`open_retriever`] picks one from configuration and [`RetrieverRegistry`]
//! shares open instances within a process.

pub mod corpus_source;
#[cfg(feature = "durable")]
pub mod durable;
pub mod ephemeral;
pub mod registry;
pub mod select;

#[cfg(feature = "durable")]
pub use durable::DurableRetriever;
pub use ephemeral::EphemeralRetriever;
pub use registry::{RegistryKey, RetrieverRegistry, SharedRetriever};
pub use select::open_retriever;
