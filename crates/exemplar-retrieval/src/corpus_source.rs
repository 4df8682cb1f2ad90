//! Reading the corpus on behalf of a retriever.

use std::path::Path;
use std::time::UNIX_EPOCH;

use exemplar_core::errors::{ExemplarResult, RetrievalError};
use exemplar_core::models::Example;

pub fn load_corpus(path: &Path) -> ExemplarResult<Vec<Example>> {
    exemplar_corpus::load_examples(path).map_err(|e| {
        RetrievalError::CorpusUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Modification time in fractional seconds since the epoch.
pub fn corpus_mtime(path: &Path) -> ExemplarResult<f64> {
    let unreadable = |reason: String| RetrievalError::CorpusUnreadable {
        path: path.display().to_string(),
        reason,
    };
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| unreadable(e.to_string()))?;
    let since = modified
        .duration_since(UNIX_EPOCH)
        .map_err(|e| unreadable(e.to_string()))?;
    Ok(since.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_corpus_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(load_corpus(&missing).unwrap_err().to_string().contains("unreadable"));
        assert!(corpus_mtime(&missing).is_err());
    }

    #[test]
    fn mtime_is_recent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        std::fs::write(&path, r#"{"questions": []}"#).unwrap();
        assert!(corpus_mtime(&path).unwrap() > 1_600_000_000.0);
        assert!(load_corpus(&path).unwrap().is_empty());
    }
}
