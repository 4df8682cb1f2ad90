//! # exemplar
//!
//! Synthesize few-shot text-to-SQL examples from a database's schema and
//! retrieve the closest stored example for a question.
//!
//! ```bash
//! exemplar synthesize --db shop.sqlite
//! exemplar retrieve "How many orders per customer?" -k 3
//! exemplar corpus validate --db shop.sqlite
//! exemplar index stats
//! exemplar index backup backups/vectordb.db
//! ```
//!
//! Logging is controlled by `EXEMPLAR_LOG` (e.g. `EXEMPLAR_LOG=exemplar_retrieval=debug`).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use exemplar_cli::commands::corpus::CorpusAction;
use exemplar_cli::commands::index::IndexAction;
use exemplar_cli::commands::retrieve::RetrieveArgs;
use exemplar_cli::commands::synthesize::SynthesizeArgs;
use exemplar_cli::commands::{corpus, index, retrieve, synthesize};
use exemplar_cli::exit_codes::exit_code_for;
use exemplar_core::config::CliOverrides;
use exemplar_core::errors::ErrorCode;
use exemplar_core::{init_tracing, ExemplarConfig, ExemplarError};
use exemplar_corpus::SaveRequest;

#[derive(Parser)]
#[command(name = "exemplar")]
#[command(about = "Few-shot example synthesis and retrieval for text-to-SQL", long_about = None)]
#[command(version)]
struct Cli {
    /// Project root holding exemplar.toml; relative corpus and store paths resolve against it
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    root: PathBuf,
    /// Example corpus file
    #[arg(long, global = true, value_name = "PATH")]
    corpus: Option<PathBuf>,
    /// Durable vector store directory
    #[arg(long, global = true, value_name = "DIR")]
    store: Option<PathBuf>,
    /// Durable collection name
    #[arg(long, global = true, value_name = "NAME")]
    collection: Option<String>,
    /// Retrieval backend: durable or ephemeral
    #[arg(long, global = true, value_name = "BACKEND")]
    backend: Option<String>,
    /// Embedding provider: tfidf or api
    #[arg(long, global = true, value_name = "PROVIDER")]
    provider: Option<String>,
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize one example per populated table of a SQLite database
    Synthesize {
        /// SQLite database file
        #[arg(long, value_name = "PATH")]
        db: PathBuf,
        /// Output corpus (defaults to --corpus / config)
        #[arg(long, short = 'o', value_name = "PATH")]
        out: Option<PathBuf>,
        /// Replace the corpus instead of appending to it
        #[arg(long)]
        replace: bool,
        /// Skip question generation and use the fallback question
        #[arg(long)]
        no_llm: bool,
        /// Database identifier recorded on each example (defaults to the file stem)
        #[arg(long, value_name = "ID")]
        db_id: Option<String>,
        /// Only synthesize from these root tables
        #[arg(long = "table", short = 't', value_name = "TABLE")]
        tables: Vec<String>,
        /// Generation model
        #[arg(long, value_name = "MODEL")]
        model: Option<String>,
    },
    /// Find the stored examples closest to a question
    Retrieve {
        #[arg(value_name = "QUERY")]
        query: String,
        /// Number of results
        #[arg(long, short = 'k', value_name = "K")]
        k: Option<usize>,
        /// Only examples of this difficulty (durable backend)
        #[arg(long, value_name = "DIFFICULTY")]
        difficulty: Option<String>,
        /// Only examples of this database (durable backend)
        #[arg(long, value_name = "ID")]
        db_id: Option<String>,
    },
    /// Manage the example corpus
    Corpus {
        #[command(subcommand)]
        command: CorpusCommands,
    },
    /// Manage the durable vector index
    Index {
        #[command(subcommand)]
        command: IndexCommands,
    },
}

#[derive(Subcommand)]
enum CorpusCommands {
    /// List every example
    List,
    /// Show one example
    Show { id: usize },
    /// Case-insensitive search over question, SQL and evidence
    Search { keyword: String },
    /// Add an example, or replace the one at --id
    Save {
        #[arg(long, value_name = "ID")]
        id: Option<usize>,
        #[arg(long)]
        question: String,
        #[arg(long)]
        sql: String,
        #[arg(long, value_name = "ID")]
        db_id: String,
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long)]
        evidence: Option<String>,
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// Delete an example; later ids shift down by one
    Delete { id: usize },
    /// Execute every example's SQL against a database
    Validate {
        #[arg(long, value_name = "PATH")]
        db: PathBuf,
    },
    /// Example count and difficulty distribution
    Stats,
}

#[derive(Subcommand)]
enum IndexCommands {
    /// Show collection statistics
    Stats,
    /// Force a full rebuild
    Rebuild,
    /// Remove the store directory
    Clean,
    /// Snapshot the store into a single file
    Backup {
        #[arg(value_name = "DEST")]
        dest: PathBuf,
    },
    /// Replace the store with a snapshot taken by `index backup`
    Restore {
        #[arg(value_name = "SRC")]
        src: PathBuf,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e.coded_string());
            exit_code_for(&e)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32, ExemplarError> {
    let (db_id, model) = match &cli.command {
        Commands::Synthesize { db_id, model, .. } => (db_id.clone(), model.clone()),
        _ => (None, None),
    };
    let overrides = CliOverrides {
        corpus_path: cli.corpus,
        store_path: cli.store,
        collection: cli.collection,
        backend: cli.backend,
        embedding_provider: cli.provider,
        generation_model: model,
        db_id,
    };
    let mut config = ExemplarConfig::load(&cli.root, Some(&overrides))?;
    config.resolve_paths(&cli.root);
    let json = cli.json;

    match cli.command {
        Commands::Synthesize {
            db,
            out,
            replace,
            no_llm,
            tables,
            ..
        } => synthesize::execute(
            &config,
            &SynthesizeArgs {
                db,
                out,
                replace,
                no_llm,
                tables,
                json,
            },
        ),
        Commands::Retrieve {
            query,
            k,
            difficulty,
            db_id,
        } => retrieve::execute(
            &config,
            &RetrieveArgs {
                query,
                k,
                difficulty,
                db_id,
                json,
            },
        ),
        Commands::Corpus { command } => {
            let action = match command {
                CorpusCommands::List => CorpusAction::List,
                CorpusCommands::Show { id } => CorpusAction::Show { id },
                CorpusCommands::Search { keyword } => CorpusAction::Search { keyword },
                CorpusCommands::Save {
                    id,
                    question,
                    sql,
                    db_id,
                    prompt,
                    evidence,
                    difficulty,
                } => CorpusAction::Save(SaveRequest {
                    id: id.unwrap_or(usize::MAX),
                    question,
                    db_id,
                    sql,
                    prompt,
                    evidence,
                    difficulty,
                    ..Default::default()
                }),
                CorpusCommands::Delete { id } => CorpusAction::Delete { id },
                CorpusCommands::Validate { db } => CorpusAction::Validate { db },
                CorpusCommands::Stats => CorpusAction::Stats,
            };
            corpus::execute(&config, action, json)
        }
        Commands::Index { command } => {
            let action = match command {
                IndexCommands::Stats => IndexAction::Stats,
                IndexCommands::Rebuild => IndexAction::Rebuild,
                IndexCommands::Clean => IndexAction::Clean,
                IndexCommands::Backup { dest } => IndexAction::Backup { dest },
                IndexCommands::Restore { src } => IndexAction::Restore { src },
            };
            index::execute(&config, action, json)
        }
    }
}
