//! `exemplar corpus`: administrative operations on the example corpus.

use std::path::PathBuf;

use exemplar_core::errors::ExemplarResult;
use exemplar_core::models::Example;
use exemplar_core::ExemplarConfig;
use exemplar_corpus::{difficulty_distribution, search, validate_corpus, ExampleCorpus, SaveRequest};
use exemplar_schema::SqliteDatabase;

use crate::exit_codes::{EXIT_INVALID_INPUT, EXIT_SUCCESS, EXIT_VALIDATION_FAILED};

#[derive(Debug, Clone)]
pub enum CorpusAction {
    List,
    Show { id: usize },
    Search { keyword: String },
    Save(SaveRequest),
    Delete { id: usize },
    Validate { db: PathBuf },
    Stats,
}

pub fn execute(config: &ExemplarConfig, action: CorpusAction, json: bool) -> ExemplarResult<i32> {
    let mut corpus = ExampleCorpus::open(&config.retrieval.corpus_path)?;

    match action {
        CorpusAction::List => {
            let rows: Vec<(usize, &Example)> = corpus.examples().iter().enumerate().collect();
            print_rows(&rows, json);
        }
        CorpusAction::Show { id } => {
            let Some(example) = corpus.get(id) else {
                eprintln!("no example with id {id} (corpus has {})", corpus.len());
                return Ok(EXIT_INVALID_INPUT);
            };
            if json {
                println!("{}", serde_json::to_string_pretty(example).unwrap_or_default());
            } else {
                println!("question:   {}", example.question);
                println!("db_id:      {}", example.db_id);
                if let Some(ref d) = example.difficulty {
                    println!("difficulty: {d}");
                }
                if let Some(ref e) = example.evidence {
                    println!("evidence:   {e}");
                }
                println!("prompt:\n{}", example.prompt);
            }
        }
        CorpusAction::Search { keyword } => {
            let rows = search(corpus.examples(), &keyword);
            print_rows(&rows, json);
        }
        CorpusAction::Save(request) => {
            let id = corpus.save(request)?;
            println!("Saved example {id}");
        }
        CorpusAction::Delete { id } => {
            let removed = corpus.delete(id)?;
            println!("Deleted example {id}: {}", removed.question);
        }
        CorpusAction::Validate { db } => {
            let db = SqliteDatabase::open(&db)?;
            let report = validate_corpus(corpus.examples(), &db);
            if json {
                println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
            } else {
                println!("{}/{} example(s) passed", report.passed, report.total);
                for issue in &report.issues {
                    let level = if issue.kind.is_error() { "error" } else { "warning" };
                    println!("  [{level}] #{}: {}", issue.id, issue.message);
                }
            }
            if !report.is_clean() {
                return Ok(EXIT_VALIDATION_FAILED);
            }
        }
        CorpusAction::Stats => {
            let distribution = difficulty_distribution(corpus.examples());
            if json {
                println!(
                    "{}",
                    serde_json::json!({"total": corpus.len(), "difficulty": distribution})
                );
            } else {
                println!("total examples: {}", corpus.len());
                for (difficulty, count) in &distribution {
                    println!("  {difficulty}: {count}");
                }
            }
        }
    }
    Ok(EXIT_SUCCESS)
}

fn print_rows(rows: &[(usize, &Example)], json: bool) {
    if json {
        let out: Vec<_> = rows
            .iter()
            .map(|(id, e)| {
                serde_json::json!({
                    "id": id,
                    "question": e.question,
                    "db_id": e.db_id,
                    "difficulty": e.difficulty,
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(out));
        return;
    }
    for (id, e) in rows {
        let difficulty = e.difficulty.as_deref().unwrap_or("-");
        println!("{id:>5}  [{}] ({difficulty})  {}", e.db_id, e.question);
    }
}
