//! Schema introspection: one read-only snapshot per synthesis run.

use exemplar_core::errors::ExemplarResult;
use exemplar_core::models::{SchemaSnapshot, Table};
use exemplar_core::traits::IDatabase;
use tracing::info;

/// Read every user table with its columns and declared foreign keys,
/// preserving catalog enumeration order.
pub fn introspect(db: &dyn IDatabase) -> ExemplarResult<SchemaSnapshot> {
    let names = db.list_tables()?;
    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        let columns = db.table_columns(&name)?;
        let foreign_keys = db.foreign_keys(&name)?;
        tables.push(Table {
            name,
            columns,
            foreign_keys,
        });
    }
    let fk_count: usize = tables.iter().map(|t| t.foreign_keys.len()).sum();
    info!(db_id = db.db_id(), tables = tables.len(), foreign_keys = fk_count, "schema introspected");
    Ok(SchemaSnapshot { tables })
}
