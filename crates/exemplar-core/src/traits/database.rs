use crate::errors::ExemplarResult;
use crate::models::{Column, ForeignKey, Row};

/// A relational database as seen by introspection and validation.
///
/// Implementations run every call on a fresh connection, so a failed
/// statement never poisons later ones.
pub trait IDatabase: Send + Sync {
    /// User tables in catalog order, system tables excluded.
    fn list_tables(&self) -> ExemplarResult<Vec<String>>;

    /// Columns of `table` in declaration order.
    fn table_columns(&self, table: &str) -> ExemplarResult<Vec<Column>>;

    /// Declared foreign keys of `table`, in catalog order.
    fn foreign_keys(&self, table: &str) -> ExemplarResult<Vec<ForeignKey>>;

    /// First row of `table`, or `None` when it is empty.
    fn sample_row(&self, table: &str) -> ExemplarResult<Option<Row>>;

    /// Run arbitrary SQL and collect its result rows.
    fn execute(&self, sql: &str) -> ExemplarResult<Vec<Row>>;

    /// Identifier recorded as `db_id` on synthesized examples.
    fn db_id(&self) -> &str;
}
