//! Index-addressed example arena with explicit renumbering on removal.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use exemplar_core::errors::{CorpusError, ExemplarResult};
use exemplar_core::models::{answer_block, AuxPrompt, Example};
use tracing::info;

use crate::file::CorpusFile;

/// Input of an administrative save. When `id` is an existing position the
/// example is replaced, otherwise a new one is appended.
#[derive(Debug, Clone, Default)]
pub struct SaveRequest {
    pub id: usize,
    pub question: String,
    pub db_id: String,
    pub sql: String,
    /// Combined prompt. Built from question and SQL when blank.
    pub prompt: Option<String>,
    pub extract_prompt: Option<String>,
    pub parse_prompt: Option<String>,
    pub evidence: Option<String>,
    pub difficulty: Option<String>,
}

/// The corpus file at `path`, loaded into memory. Mutations are persisted
/// immediately; every save leaves a backup of the previous file.
#[derive(Debug)]
pub struct ExampleCorpus {
    path: PathBuf,
    data: CorpusFile,
}

impl ExampleCorpus {
    /// Open the corpus at `path`, creating an empty one if missing.
    pub fn open(path: impl AsRef<Path>) -> ExemplarResult<Self> {
        let path = path.as_ref().to_path_buf();
        let data = CorpusFile::load_or_create(&path)?;
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn examples(&self) -> &[Example] {
        &self.data.questions
    }

    pub fn get(&self, id: usize) -> Option<&Example> {
        self.data.questions.get(id)
    }

    pub fn len(&self) -> usize {
        self.data.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.questions.is_empty()
    }

    pub fn extract_prompt(&self, id: usize) -> Option<&AuxPrompt> {
        self.data.extract.get(&id)
    }

    pub fn parse_prompt(&self, id: usize) -> Option<&AuxPrompt> {
        self.data.parse.get(&id)
    }

    pub fn file(&self) -> &CorpusFile {
        &self.data
    }

    /// Re-read the file, discarding in-memory state.
    pub fn reload(&mut self) -> ExemplarResult<()> {
        self.data = CorpusFile::load_or_create(&self.path)?;
        Ok(())
    }

    /// Create or update one example and its auxiliary prompts. Returns the
    /// id the example ended up at.
    pub fn save(&mut self, request: SaveRequest) -> ExemplarResult<usize> {
        let id = request.id.min(self.len());

        upsert_aux(&mut self.data.extract, id, request.extract_prompt);
        upsert_aux(&mut self.data.parse, id, request.parse_prompt);

        let prompt = request
            .prompt
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| answer_block(&request.question, &request.sql));
        let mut example = Example::new(request.question, request.db_id, prompt);
        example.question_id = Some(id);
        example.sql = Some(request.sql).filter(|s| !s.trim().is_empty());
        example.evidence = request.evidence;
        example.difficulty = request.difficulty;

        if id < self.len() {
            self.data.questions[id] = example;
            info!(id, "example updated");
        } else {
            self.data.questions.push(example);
            info!(id, "example added");
        }
        self.persist()?;
        Ok(id)
    }

    /// Append examples at the end, e.g. the output of a synthesis run.
    /// Returns the id of the first appended example.
    pub fn append(&mut self, examples: Vec<Example>) -> ExemplarResult<usize> {
        let first = self.len();
        let count = examples.len();
        for (offset, mut example) in examples.into_iter().enumerate() {
            example.question_id = Some(first + offset);
            self.data.questions.push(example);
        }
        self.persist()?;
        info!(first, count, "examples appended");
        Ok(first)
    }

    /// Swap the whole corpus for `examples`, dropping every auxiliary prompt.
    pub fn replace(&mut self, examples: Vec<Example>) -> ExemplarResult<()> {
        let mut data = CorpusFile::from_examples(examples);
        for (id, example) in data.questions.iter_mut().enumerate() {
            example.question_id = Some(id);
        }
        self.data = data;
        self.persist()?;
        info!(count = self.len(), "corpus replaced");
        Ok(())
    }

    /// Remove example `id`. Every later example, and its auxiliary
    /// prompts, shifts down by one.
    pub fn delete(&mut self, id: usize) -> ExemplarResult<Example> {
        let removed = remove_and_renumber(&mut self.data, id)?;
        self.persist()?;
        info!(id, remaining = self.len(), "example deleted");
        Ok(removed)
    }

    fn persist(&self) -> ExemplarResult<()> {
        self.data.save(&self.path)
    }
}

/// Set `map[id]` when a non-blank prompt is supplied; otherwise make sure
/// an entry exists without touching an existing one.
fn upsert_aux(map: &mut BTreeMap<usize, AuxPrompt>, id: usize, prompt: Option<String>) {
    match prompt.filter(|p| !p.trim().is_empty()) {
        Some(prompt) => {
            map.insert(id, AuxPrompt::new(prompt));
        }
        None => {
            map.entry(id).or_default();
        }
    }
}

/// In-memory half of [`ExampleCorpus::delete`].
pub fn remove_and_renumber(data: &mut CorpusFile, id: usize) -> Result<Example, CorpusError> {
    let len = data.questions.len();
    if id >= len {
        return Err(CorpusError::IdOutOfRange { id, len });
    }
    let removed = data.questions.remove(id);

    data.extract = shift_down(std::mem::take(&mut data.extract), id);
    data.parse = shift_down(std::mem::take(&mut data.parse), id);
    for (position, example) in data.questions.iter_mut().enumerate() {
        example.question_id = Some(position);
    }
    Ok(removed)
}

fn shift_down(map: BTreeMap<usize, AuxPrompt>, removed: usize) -> BTreeMap<usize, AuxPrompt> {
    map.into_iter()
        .filter(|(key, _)| *key != removed)
        .map(|(key, value)| if key > removed { (key - 1, value) } else { (key, value) })
        .collect()
}
