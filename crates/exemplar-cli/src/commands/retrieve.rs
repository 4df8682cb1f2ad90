//! `exemplar retrieve`: nearest examples for a question.

use exemplar_core::errors::ExemplarResult;
use exemplar_core::models::{Example, MetadataFilter, ScoredExample};
use exemplar_core::ExemplarConfig;
use exemplar_embeddings::EmbeddingEngine;
use exemplar_retrieval::{open_retriever, DurableRetriever};
use tracing::warn;

use crate::exit_codes::{EXIT_INVALID_INPUT, EXIT_SUCCESS};

#[derive(Debug, Clone, Default)]
pub struct RetrieveArgs {
    pub query: String,
    /// Defaults to `retrieval.default_k`.
    pub k: Option<usize>,
    pub difficulty: Option<String>,
    pub db_id: Option<String>,
    pub json: bool,
}

impl RetrieveArgs {
    fn filter(&self) -> MetadataFilter {
        MetadataFilter {
            db_id: self.db_id.clone(),
            difficulty: self.difficulty.clone(),
            has_sql: None,
        }
    }
}

pub fn execute(config: &ExemplarConfig, args: &RetrieveArgs) -> ExemplarResult<i32> {
    let k = args.k.unwrap_or(config.retrieval.default_k);
    let filter = args.filter();

    let hits = if filter.is_empty() {
        open_retriever(&config.retrieval, &config.embedding)?.retrieve_top_k(&args.query, k)?
    } else if config.retrieval.backend == "durable" {
        let mut durable = DurableRetriever::open(
            &config.retrieval.corpus_path,
            &config.retrieval.store_path,
            &config.retrieval.collection,
            Box::new(EmbeddingEngine::new(&config.embedding)),
        )?;
        durable.retrieve_top_k_filtered(&args.query, k, &filter)?
    } else {
        warn!(backend = %config.retrieval.backend, "metadata filters need the durable backend");
        return Ok(EXIT_INVALID_INPUT);
    };

    let examples = exemplar_corpus::load_examples(&config.retrieval.corpus_path)?;
    print_hits(&hits, &examples, args.json);
    Ok(EXIT_SUCCESS)
}

fn print_hits(hits: &[ScoredExample], examples: &[Example], json: bool) {
    if json {
        let rows: Vec<_> = hits
            .iter()
            .map(|h| {
                let example = examples.get(h.id);
                serde_json::json!({
                    "id": h.id,
                    "score": h.score,
                    "question": example.map(|e| e.question.as_str()),
                    "db_id": example.map(|e| e.db_id.as_str()),
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(rows));
        return;
    }
    for h in hits {
        let question = examples.get(h.id).map_or("<missing>", |e| e.question.as_str());
        println!("{:>5}  {:.4}  {question}", h.id, h.score);
    }
}
