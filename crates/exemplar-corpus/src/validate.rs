//! Executes every example's SQL against a database and reports problems.

use std::collections::BTreeMap;

use exemplar_core::models::Example;
use exemplar_core::traits::IDatabase;
use serde::Serialize;
use tracing::{info, warn};

use crate::extract::sql_of;
use crate::search::difficulty_distribution;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingSql,
    SqlError,
    MissingQuestion,
    EmptyResult,
}

impl IssueKind {
    /// Errors make the corpus unusable; warnings do not.
    pub fn is_error(self) -> bool {
        matches!(self, Self::MissingSql | Self::SqlError)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusIssue {
    pub id: usize,
    pub kind: IssueKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub total: usize,
    pub passed: usize,
    pub issues: Vec<CorpusIssue>,
    pub difficulty: BTreeMap<String, usize>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &CorpusIssue> {
        self.issues.iter().filter(|i| i.kind.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CorpusIssue> {
        self.issues.iter().filter(|i| !i.kind.is_error())
    }

    pub fn is_clean(&self) -> bool {
        self.errors().next().is_none()
    }
}

/// Run each example's SQL (explicit field, else extracted from the prompt).
pub fn validate_corpus(examples: &[Example], db: &dyn IDatabase) -> ValidationReport {
    let mut report = ValidationReport {
        total: examples.len(),
        difficulty: difficulty_distribution(examples),
        ..Default::default()
    };

    for (id, example) in examples.iter().enumerate() {
        let issue = |kind, message: &str| CorpusIssue {
            id,
            kind,
            message: message.to_string(),
        };

        if example.question.trim().is_empty() {
            report.issues.push(issue(IssueKind::MissingQuestion, "question is empty"));
        }
        let Some(sql) = sql_of(example) else {
            report.issues.push(issue(IssueKind::MissingSql, "no SQL found"));
            continue;
        };
        match db.execute(&sql) {
            Ok(rows) => {
                if rows.is_empty() {
                    report.issues.push(issue(IssueKind::EmptyResult, "SQL ran but returned no rows"));
                }
                report.passed += 1;
            }
            Err(e) => {
                warn!(id, error = %e, "corpus SQL failed");
                report.issues.push(issue(IssueKind::SqlError, &e.to_string()));
            }
        }
    }

    info!(
        total = report.total,
        passed = report.passed,
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "corpus validated"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use exemplar_core::errors::{ExemplarResult, SchemaError};
    use exemplar_core::models::{Column, ForeignKey, Row, SqlValue};

    /// Accepts `SELECT 1` (one row) and `SELECT 0` (no rows); rejects the rest.
    struct Scripted;

    impl IDatabase for Scripted {
        fn list_tables(&self) -> ExemplarResult<Vec<String>> {
            Ok(Vec::new())
        }
        fn table_columns(&self, _table: &str) -> ExemplarResult<Vec<Column>> {
            Ok(Vec::new())
        }
        fn foreign_keys(&self, _table: &str) -> ExemplarResult<Vec<ForeignKey>> {
            Ok(Vec::new())
        }
        fn sample_row(&self, _table: &str) -> ExemplarResult<Option<Row>> {
            Ok(None)
        }
        fn execute(&self, sql: &str) -> ExemplarResult<Vec<Row>> {
            match sql {
                "SELECT 1" => Ok(vec![Row::new(vec![("1".into(), SqlValue::Integer(1))])]),
                "SELECT 0" => Ok(Vec::new()),
                _ => Err(SchemaError::ExecutionFailed {
                    reason: "syntax error".into(),
                }
                .into()),
            }
        }
        fn db_id(&self) -> &str {
            "scripted"
        }
    }

    fn ex(question: &str, prompt: &str, difficulty: Option<&str>) -> Example {
        let mut e = Example::new(question, "db", prompt);
        e.difficulty = difficulty.map(str::to_string);
        e
    }

    #[test]
    fn classifies_errors_and_warnings() {
        let examples = vec![
            ex("ok", "/* q */\nSELECT 1", Some("simple")),
            ex("", "SELECT 1", None),
            ex("empty", "SELECT 0", None),
            ex("broken", "SELECT oops", Some("challenging")),
            ex("nosql", "just text", None),
        ];
        let report = validate_corpus(&examples, &Scripted);
        assert_eq!(report.total, 5);
        assert_eq!(report.passed, 3);
        assert!(!report.is_clean());

        let kinds: Vec<(usize, IssueKind)> = report.issues.iter().map(|i| (i.id, i.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (1, IssueKind::MissingQuestion),
                (2, IssueKind::EmptyResult),
                (3, IssueKind::SqlError),
                (4, IssueKind::MissingSql),
            ]
        );
        assert_eq!(report.errors().count(), 2);
        assert_eq!(report.difficulty["unknown"], 3);
    }

    #[test]
    fn clean_corpus() {
        let report = validate_corpus(&[ex("ok", "SELECT 1", None)], &Scripted);
        assert!(report.is_clean());
        assert_eq!(report.warnings().count(), 0);
    }
}
