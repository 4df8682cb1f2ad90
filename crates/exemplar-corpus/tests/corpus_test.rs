//! Administrative CRUD over an on-disk corpus.

use exemplar_corpus::file::backup_path;
use exemplar_corpus::{CorpusFile, ExampleCorpus, SaveRequest};
use exemplar_core::errors::{CorpusError, ExemplarError};
use exemplar_core::models::Example;

fn request(id: usize, question: &str) -> SaveRequest {
    SaveRequest {
        id,
        question: question.to_string(),
        db_id: "shop".to_string(),
        sql: format!("SELECT '{question}'"),
        ..Default::default()
    }
}

#[test]
fn save_appends_beyond_end_and_updates_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fewshot/questions.json");
    let mut corpus = ExampleCorpus::open(&path).unwrap();
    assert!(corpus.is_empty());

    assert_eq!(corpus.save(request(0, "first")).unwrap(), 0);
    // An id past the end lands at the next free position.
    assert_eq!(corpus.save(request(9, "second")).unwrap(), 1);
    assert_eq!(corpus.save(request(0, "first, edited")).unwrap(), 0);

    let reopened = ExampleCorpus::open(&path).unwrap();
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.get(0).unwrap().question, "first, edited");
    assert_eq!(reopened.get(1).unwrap().question_id, Some(1));
    assert_eq!(
        reopened.get(1).unwrap().prompt,
        "/* Answer the following question: second */\nSELECT 'second'"
    );
    // Missing auxiliary prompts are created empty.
    assert_eq!(reopened.extract_prompt(1).unwrap().prompt, "");
    assert_eq!(reopened.parse_prompt(1).unwrap().prompt, "");
    assert!(backup_path(&path).exists());
}

#[test]
fn blank_aux_prompt_keeps_existing_entry() {
    let dir = tempfile::tempdir().unwrap();
    let mut corpus = ExampleCorpus::open(dir.path().join("q.json")).unwrap();
    let mut req = request(0, "q");
    req.extract_prompt = Some("extract me".into());
    corpus.save(req).unwrap();

    let mut again = request(0, "q2");
    again.extract_prompt = Some("   ".into());
    corpus.save(again).unwrap();
    assert_eq!(corpus.extract_prompt(0).unwrap().prompt, "extract me");
}

#[test]
fn delete_renumbers_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("q.json");
    let mut corpus = ExampleCorpus::open(&path).unwrap();
    for i in 0..5 {
        let mut req = request(i, &format!("q{i}"));
        req.extract_prompt = Some(format!("extract {i}"));
        req.parse_prompt = Some(format!("parse {i}"));
        corpus.save(req).unwrap();
    }

    let removed = corpus.delete(2).unwrap();
    assert_eq!(removed.question, "q2");

    let on_disk = CorpusFile::load(&path).unwrap();
    assert_eq!(on_disk.questions.len(), 4);
    assert_eq!(on_disk.extract[&2].prompt, "extract 3");
    assert_eq!(on_disk.parse[&3].prompt, "parse 4");
    assert_eq!(on_disk.extract.len(), 4);
    let ids: Vec<_> = on_disk.questions.iter().map(|q| q.question_id).collect();
    assert_eq!(ids, vec![Some(0), Some(1), Some(2), Some(3)]);
}

#[test]
fn delete_past_end_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut corpus = ExampleCorpus::open(dir.path().join("q.json")).unwrap();
    corpus.save(request(0, "only")).unwrap();
    let err = corpus.delete(1).unwrap_err();
    assert!(matches!(
        err,
        ExemplarError::Corpus(CorpusError::IdOutOfRange { id: 1, len: 1 })
    ));
}

#[test]
fn append_assigns_consecutive_ids() {
    let dir = tempfile::tempdir().unwrap();
    let mut corpus = ExampleCorpus::open(dir.path().join("q.json")).unwrap();
    corpus.save(request(0, "existing")).unwrap();
    let first = corpus
        .append(vec![Example::new("a", "db", "p"), Example::new("b", "db", "p")])
        .unwrap();
    assert_eq!(first, 1);
    assert_eq!(corpus.get(2).unwrap().question_id, Some(2));
    corpus.reload().unwrap();
    assert_eq!(corpus.len(), 3);
}

#[test]
fn replace_drops_previous_examples_and_aux_prompts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("q.json");
    let mut corpus = ExampleCorpus::open(&path).unwrap();
    corpus.save(request(0, "old one")).unwrap();
    corpus.save(request(1, "old two")).unwrap();

    corpus.replace(vec![Example::new("new", "db", "p")]).unwrap();
    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus.get(0).unwrap().question_id, Some(0));
    assert!(corpus.extract_prompt(0).is_none());

    let on_disk = CorpusFile::load(&path).unwrap();
    assert_eq!(on_disk.questions[0].question, "new");
    assert!(backup_path(&path).exists());
}
