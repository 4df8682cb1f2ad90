//! Binary pass/fail check of a candidate statement against the live database.

use exemplar_core::traits::IDatabase;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid { rows: usize },
    Invalid { reason: String },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Execute `sql` once on a fresh connection. Any failure invalidates it;
/// there is no retry and no alternate construction.
pub fn validate_sql(db: &dyn IDatabase, sql: &str) -> Validation {
    match db.execute(sql) {
        Ok(rows) => Validation::Valid { rows: rows.len() },
        Err(e) => {
            debug!(error = %e, "candidate SQL rejected");
            Validation::Invalid {
                reason: e.to_string(),
            }
        }
    }
}
