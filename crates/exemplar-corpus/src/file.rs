//! On-disk corpus format: `{ "extract": {}, "parse": {}, "questions": [] }`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use exemplar_core::constants::CORPUS_BACKUP_EXTENSION;
use exemplar_core::errors::{CorpusError, ExemplarResult};
use exemplar_core::models::{AuxPrompt, Example};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The whole corpus file. `extract` and `parse` are keyed by example id
/// and must stay aligned with `questions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusFile {
    #[serde(default)]
    pub extract: BTreeMap<usize, AuxPrompt>,
    #[serde(default)]
    pub parse: BTreeMap<usize, AuxPrompt>,
    #[serde(default)]
    pub questions: Vec<Example>,
}

impl CorpusFile {
    pub fn from_examples(questions: Vec<Example>) -> Self {
        Self {
            questions,
            ..Default::default()
        }
    }

    /// Read `path`, creating an empty corpus file when it does not exist.
    pub fn load_or_create(path: &Path) -> ExemplarResult<Self> {
        if !path.exists() {
            let empty = Self::default();
            empty.write(path)?;
            info!(path = %path.display(), "created empty corpus file");
            return Ok(empty);
        }
        Self::load(path)
    }

    pub fn load(path: &Path) -> ExemplarResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        let file: Self = serde_json::from_str(&text).map_err(|e| CorpusError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), examples = file.questions.len(), "corpus loaded");
        Ok(file)
    }

    /// Write pretty-printed JSON, first copying any existing file to
    /// `<name>.json.backup`.
    pub fn save(&self, path: &Path) -> ExemplarResult<()> {
        if path.exists() {
            let backup = backup_path(path);
            fs::copy(path, &backup).map_err(|e| io_error(&backup, e))?;
        }
        self.write(path)
    }

    fn write(&self, path: &Path) -> ExemplarResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        let text = serde_json::to_string_pretty(self).map_err(|e| CorpusError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::write(path, text).map_err(|e| io_error(path, e))?;
        Ok(())
    }
}

/// `questions.json` -> `questions.json.backup`.
pub fn backup_path(path: &Path) -> PathBuf {
    path.with_extension(CORPUS_BACKUP_EXTENSION)
}

/// Just the ordered examples of the corpus at `path`.
pub fn load_examples(path: &Path) -> ExemplarResult<Vec<Example>> {
    Ok(CorpusFile::load(path)?.questions)
}

fn io_error(path: &Path, e: std::io::Error) -> CorpusError {
    CorpusError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fewshot").join("questions.json");
        let file = CorpusFile::load_or_create(&path).unwrap();
        assert!(file.questions.is_empty());
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"extract": {}, "parse": {}, "questions": []}));
    }

    #[test]
    fn save_keeps_previous_version_as_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        CorpusFile::from_examples(vec![Example::new("first", "db", "")])
            .save(&path)
            .unwrap();
        assert!(!backup_path(&path).exists());

        CorpusFile::from_examples(vec![Example::new("second", "db", "")])
            .save(&path)
            .unwrap();
        let backup = CorpusFile::load(&backup_path(&path)).unwrap();
        assert_eq!(backup.questions[0].question, "first");
        assert_eq!(load_examples(&path).unwrap()[0].question, "second");
        assert_eq!(backup_path(&path), dir.path().join("questions.json.backup"));
    }

    #[test]
    fn aux_keys_are_numeric_strings_on_disk() {
        let mut file = CorpusFile::from_examples(vec![Example::default()]);
        file.extract.insert(0, AuxPrompt::new("e0"));
        let text = serde_json::to_string(&file).unwrap();
        assert!(text.contains(r#""extract":{"0":{"prompt":"e0"}}"#));
        let back: CorpusFile = serde_json::from_str(&text).unwrap();
        assert_eq!(back, file);
    }

    #[test]
    fn non_ascii_text_is_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        CorpusFile::from_examples(vec![Example::new("查詢資料", "db", "")])
            .save(&path)
            .unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("查詢資料"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        fs::write(&path, "{not json").unwrap();
        let err = CorpusFile::load(&path).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
