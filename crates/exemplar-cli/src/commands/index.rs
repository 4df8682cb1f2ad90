//! `exemplar index`: durable collection maintenance.

use std::path::PathBuf;

use exemplar_core::errors::ExemplarResult;
use exemplar_core::ExemplarConfig;
use exemplar_embeddings::EmbeddingEngine;
use exemplar_retrieval::DurableRetriever;

use crate::exit_codes::EXIT_SUCCESS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexAction {
    Stats,
    Rebuild,
    Clean,
    /// Snapshot the store into a single file.
    Backup { dest: PathBuf },
    /// Replace the store with a snapshot.
    Restore { src: PathBuf },
}

fn open(config: &ExemplarConfig) -> ExemplarResult<DurableRetriever> {
    DurableRetriever::open(
        &config.retrieval.corpus_path,
        &config.retrieval.store_path,
        &config.retrieval.collection,
        Box::new(EmbeddingEngine::new(&config.embedding)),
    )
}

pub fn execute(config: &ExemplarConfig, action: IndexAction, json: bool) -> ExemplarResult<i32> {
    match action {
        IndexAction::Stats => {
            let stats = open(config)?.stats()?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "collection_name": stats.collection_name,
                        "total_examples": stats.total_examples,
                        "embedding_model": stats.embedding_model,
                        "dimensions": stats.dimensions,
                        "last_update": stats.last_update,
                    })
                );
            } else {
                let updated = stats
                    .last_update_utc()
                    .map_or_else(|| stats.last_update.to_string(), |t| t.to_rfc3339());
                println!("collection:      {}", stats.collection_name);
                println!("total examples:  {}", stats.total_examples);
                println!("embedding model: {} ({} dims)", stats.embedding_model, stats.dimensions);
                println!("last update:     {updated}");
            }
        }
        IndexAction::Rebuild => {
            let mut retriever = open(config)?;
            retriever.reset()?;
            let stats = retriever.stats()?;
            println!(
                "Rebuilt {} with {} example(s)",
                stats.collection_name, stats.total_examples
            );
        }
        IndexAction::Clean => {
            if DurableRetriever::clean(&config.retrieval.store_path)? {
                println!("Removed {}", config.retrieval.store_path.display());
            } else {
                println!("Nothing to remove at {}", config.retrieval.store_path.display());
            }
        }
        IndexAction::Backup { dest } => {
            DurableRetriever::backup(&config.retrieval.store_path, &dest)?;
            println!(
                "Backed up {} to {}",
                config.retrieval.store_path.display(),
                dest.display()
            );
        }
        IndexAction::Restore { src } => {
            DurableRetriever::restore(&config.retrieval.store_path, &src)?;
            println!(
                "Restored {} from {}",
                config.retrieval.store_path.display(),
                src.display()
            );
        }
    }
    Ok(EXIT_SUCCESS)
}
