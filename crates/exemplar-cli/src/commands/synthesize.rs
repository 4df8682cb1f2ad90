//! `exemplar synthesize`: one example per populated table of a SQLite
//! database, appended to (or replacing) the corpus.

use std::path::PathBuf;

use exemplar_core::errors::ExemplarResult;
use exemplar_core::traits::IQuestionGenerator;
use exemplar_core::ExemplarConfig;
use exemplar_corpus::ExampleCorpus;
use exemplar_generation::ChatCompletionsClient;
use exemplar_schema::{SchemaSynthesizer, SqliteDatabase};
use tracing::{info, warn};

use crate::exit_codes::EXIT_SUCCESS;

#[derive(Debug, Clone, Default)]
pub struct SynthesizeArgs {
    pub db: PathBuf,
    /// Defaults to the configured corpus path.
    pub out: Option<PathBuf>,
    /// Replace the corpus instead of appending.
    pub replace: bool,
    /// Skip question generation and use the fallback question.
    pub no_llm: bool,
    /// Restrict the run to these root tables.
    pub tables: Vec<String>,
    pub json: bool,
}

pub fn execute(config: &ExemplarConfig, args: &SynthesizeArgs) -> ExemplarResult<i32> {
    let db = SqliteDatabase::open(&args.db)?;

    let client = if args.no_llm {
        None
    } else {
        match ChatCompletionsClient::from_config(&config.generation) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "question generation disabled");
                None
            }
        }
    };

    let mut synthesizer = SchemaSynthesizer::new(&db, config.synthesis.clone());
    if let Some(ref client) = client {
        synthesizer = synthesizer.with_generator(client as &dyn IQuestionGenerator);
    }

    let report = if args.tables.is_empty() {
        synthesizer.run()?
    } else {
        synthesizer.run_tables(&args.tables)?
    };

    let out = args.out.clone().unwrap_or_else(|| config.retrieval.corpus_path.clone());
    let mut corpus = ExampleCorpus::open(&out)?;
    let written = report.examples.len();
    let first = if args.replace {
        corpus.replace(report.examples.clone())?;
        0
    } else {
        corpus.append(report.examples.clone())?
    };
    info!(
        corpus = %out.display(),
        written,
        skipped = report.skipped.len(),
        "synthesis finished"
    );

    if args.json {
        let skipped: Vec<_> = report
            .skipped
            .iter()
            .map(|(table, reason)| serde_json::json!({"table": table, "reason": reason}))
            .collect();
        println!(
            "{}",
            serde_json::json!({
                "corpus": out.display().to_string(),
                "first_id": first,
                "written": written,
                "fallback_questions": report.fallback_questions,
                "skipped": skipped,
            })
        );
    } else {
        println!("Wrote {written} example(s) to {} starting at id {first}", out.display());
        for (table, reason) in &report.skipped {
            println!("  skipped {table}: {reason}");
        }
        if report.fallback_questions > 0 {
            println!("  {} question(s) used the fallback text", report.fallback_questions);
        }
    }
    if let Some(client) = client {
        let usage = client.usage();
        info!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "generation usage"
        );
    }
    Ok(EXIT_SUCCESS)
}
