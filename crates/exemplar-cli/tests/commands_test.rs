//! Commands driven end to end against temporary files.

use std::path::{Path, PathBuf};

use exemplar_cli::commands::corpus::{self, CorpusAction};
use exemplar_cli::commands::index::{self, IndexAction};
use exemplar_cli::commands::retrieve::{self, RetrieveArgs};
use exemplar_cli::commands::synthesize::{self, SynthesizeArgs};
use exemplar_cli::exit_codes::*;
use exemplar_core::ExemplarConfig;
use exemplar_corpus::{ExampleCorpus, SaveRequest};

fn fixture_db(dir: &Path) -> PathBuf {
    let path = dir.join("library.sqlite");
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute_batch(
            "CREATE TABLE author (id INTEGER PRIMARY KEY, name TEXT);
             CREATE TABLE book (id INTEGER PRIMARY KEY, author_id INTEGER REFERENCES author(id), title TEXT);
             CREATE TABLE shelf (id INTEGER PRIMARY KEY, label TEXT);
             INSERT INTO author VALUES (1, 'Le Guin');
             INSERT INTO book VALUES (7, 1, 'The Dispossessed');",
        )
        .unwrap();
    path
}

fn config(dir: &Path) -> ExemplarConfig {
    let mut config = ExemplarConfig::default();
    config.retrieval.corpus_path = dir.join("fewshot").join("questions.json");
    config.retrieval.store_path = dir.join(".vectordb");
    config.embedding.dimensions = 128;
    config
}

fn synthesize_into(dir: &Path, config: &ExemplarConfig) {
    let args = SynthesizeArgs {
        db: fixture_db(dir),
        no_llm: true,
        ..Default::default()
    };
    assert_eq!(synthesize::execute(config, &args).unwrap(), EXIT_SUCCESS);
}

#[test]
fn synthesize_writes_one_example_per_populated_table() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    synthesize_into(dir.path(), &config);

    let corpus = ExampleCorpus::open(&config.retrieval.corpus_path).unwrap();
    assert_eq!(corpus.len(), 2);
    assert!(corpus.examples().iter().all(|e| e.db_id == "library"));
    assert_eq!(corpus.get(1).unwrap().question_id, Some(1));

    // Appending a second run keeps the first.
    synthesize_into(dir.path(), &config);
    assert_eq!(ExampleCorpus::open(&config.retrieval.corpus_path).unwrap().len(), 4);
}

#[test]
fn synthesized_corpus_validates_against_its_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    synthesize_into(dir.path(), &config);
    let code = corpus::execute(
        &config,
        CorpusAction::Validate {
            db: dir.path().join("library.sqlite"),
        },
        false,
    )
    .unwrap();
    assert_eq!(code, EXIT_SUCCESS);
}

#[test]
fn broken_sql_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let db = fixture_db(dir.path());
    corpus::execute(
        &config,
        CorpusAction::Save(SaveRequest {
            id: 0,
            question: "Bad".into(),
            db_id: "library".into(),
            sql: "SELECT nope FROM nowhere".into(),
            ..Default::default()
        }),
        false,
    )
    .unwrap();
    let code = corpus::execute(&config, CorpusAction::Validate { db }, true).unwrap();
    assert_eq!(code, EXIT_VALIDATION_FAILED);
}

#[test]
fn delete_out_of_range_maps_to_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let err = corpus::execute(&config, CorpusAction::Delete { id: 3 }, false).unwrap_err();
    assert_eq!(exit_code_for(&err), EXIT_INVALID_INPUT);
    assert_eq!(
        corpus::execute(&config, CorpusAction::Show { id: 0 }, false).unwrap(),
        EXIT_INVALID_INPUT
    );
}

#[test]
fn retrieve_and_index_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    synthesize_into(dir.path(), &config);

    let args = RetrieveArgs {
        query: "books by author".into(),
        k: Some(2),
        ..Default::default()
    };
    assert_eq!(retrieve::execute(&config, &args).unwrap(), EXIT_SUCCESS);
    assert!(config.retrieval.store_path.exists());

    assert_eq!(index::execute(&config, IndexAction::Stats, true).unwrap(), EXIT_SUCCESS);
    assert_eq!(index::execute(&config, IndexAction::Rebuild, false).unwrap(), EXIT_SUCCESS);

    let snapshot = dir.path().join("snapshots").join("vectordb.db");
    let backup = IndexAction::Backup {
        dest: snapshot.clone(),
    };
    assert_eq!(index::execute(&config, backup, false).unwrap(), EXIT_SUCCESS);
    assert!(snapshot.exists());

    assert_eq!(index::execute(&config, IndexAction::Clean, false).unwrap(), EXIT_SUCCESS);
    assert!(!config.retrieval.store_path.exists());

    let restore = IndexAction::Restore { src: snapshot };
    assert_eq!(index::execute(&config, restore, false).unwrap(), EXIT_SUCCESS);
    assert!(config.retrieval.store_path.exists());
    assert_eq!(index::execute(&config, IndexAction::Stats, true).unwrap(), EXIT_SUCCESS);
}

#[test]
fn filters_require_durable_backend() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    synthesize_into(dir.path(), &config);
    config.retrieval.backend = "ephemeral".into();
    let args = RetrieveArgs {
        query: "anything".into(),
        difficulty: Some("simple".into()),
        ..Default::default()
    };
    assert_eq!(retrieve::execute(&config, &args).unwrap(), EXIT_INVALID_INPUT);
}
