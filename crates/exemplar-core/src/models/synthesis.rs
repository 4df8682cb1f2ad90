//! Outcomes of synthesizing one example per root table.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::example::Example;

/// Why a root table produced no example. Expected, non-exceptional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The root table has no rows to draw a predicate from.
    EmptyTable,
    /// Reading the sample row failed.
    SampleFailed { reason: String },
    /// The candidate SQL did not execute.
    ValidationFailed { sql: String, reason: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTable => f.write_str("table has no rows"),
            Self::SampleFailed { reason } => write!(f, "sample row failed: {reason}"),
            Self::ValidationFailed { reason, .. } => write!(f, "SQL failed validation: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisOutcome {
    Synthesized(Example),
    Skipped { table: String, reason: SkipReason },
}

/// Batch result: retained examples in table order, plus every skip.
#[derive(Debug, Clone, Default)]
pub struct SynthesisReport {
    pub examples: Vec<Example>,
    pub skipped: Vec<(String, SkipReason)>,
    /// Number of examples whose question fell back to the placeholder.
    pub fallback_questions: usize,
}

impl SynthesisReport {
    pub fn record(&mut self, outcome: SynthesisOutcome) {
        match outcome {
            SynthesisOutcome::Synthesized(example) => self.examples.push(example),
            SynthesisOutcome::Skipped { table, reason } => self.skipped.push((table, reason)),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}
