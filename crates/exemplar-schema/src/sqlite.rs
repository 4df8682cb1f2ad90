//! SQLite implementation of [`IDatabase`].

use std::path::{Path, PathBuf};

use exemplar_core::errors::{ExemplarResult, SchemaError};
use exemplar_core::models::{Column, ForeignKey, Row, SqlValue};
use exemplar_core::traits::IDatabase;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, warn};

use crate::synthesizer::ident;

/// A SQLite database file. Every operation opens its own read-only
/// connection and closes it on return.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    path: PathBuf,
    db_id: String,
}

impl SqliteDatabase {
    /// Open `path`, verifying it is a readable SQLite file.
    /// `db_id` defaults to the file stem.
    pub fn open(path: impl AsRef<Path>) -> ExemplarResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(SchemaError::OpenFailed {
                path: path.display().to_string(),
                reason: "file does not exist".to_string(),
            }
            .into());
        }
        let db_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let db = Self { path, db_id };
        // Fail fast on files that are not databases.
        db.connect()?
            .query_row("SELECT count(*) FROM sqlite_master", [], |r| r.get::<_, i64>(0))
            .map_err(|e| db.open_failed(e))?;
        Ok(db)
    }

    pub fn with_db_id(mut self, db_id: impl Into<String>) -> Self {
        self.db_id = db_id.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> ExemplarResult<Connection> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| self.open_failed(e).into())
    }

    fn open_failed(&self, e: rusqlite::Error) -> SchemaError {
        SchemaError::OpenFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }

    /// Primary-key columns of `table`, ordered by key position.
    fn primary_key(&self, conn: &Connection, table: &str) -> ExemplarResult<Vec<String>> {
        let mut stmt = conn
            .prepare("SELECT name FROM pragma_table_info(?1) WHERE pk > 0 ORDER BY pk")
            .map_err(|e| introspection_failed(table, e))?;
        let names = stmt
            .query_map([table], |r| r.get::<_, String>(0))
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(|e| introspection_failed(table, e))?;
        Ok(names)
    }
}

impl IDatabase for SqliteDatabase {
    fn list_tables(&self) -> ExemplarResult<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'")
            .map_err(|e| introspection_failed("sqlite_master", e))?;
        let tables = stmt
            .query_map([], |r| r.get::<_, String>(0))
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(|e| introspection_failed("sqlite_master", e))?;
        Ok(tables)
    }

    fn table_columns(&self, table: &str) -> ExemplarResult<Vec<Column>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT cid, name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1)",
            )
            .map_err(|e| introspection_failed(table, e))?;
        let columns = stmt
            .query_map([table], |r| {
                Ok(Column {
                    ordinal: r.get(0)?,
                    name: r.get(1)?,
                    declared_type: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    not_null: r.get::<_, i64>(3)? != 0,
                    default_value: r.get(4)?,
                    is_primary_key: r.get::<_, i64>(5)? != 0,
                })
            })
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(|e| introspection_failed(table, e))?;
        if columns.is_empty() {
            return Err(SchemaError::UnknownTable {
                table: table.to_string(),
            }
            .into());
        }
        Ok(columns)
    }

    fn foreign_keys(&self, table: &str) -> ExemplarResult<Vec<ForeignKey>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT seq, \"table\", \"from\", \"to\" FROM pragma_foreign_key_list(?1)")
            .map_err(|e| introspection_failed(table, e))?;
        let raw = stmt
            .query_map([table], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, Option<String>>(3)?,
                ))
            })
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(|e| introspection_failed(table, e))?;

        let mut keys = Vec::with_capacity(raw.len());
        for (seq, to_table, from_column, to_column) in raw {
            // `REFERENCES parent` without a column list targets the parent's primary key.
            let to_column = match to_column {
                Some(col) => col,
                None => {
                    let pk = self.primary_key(&conn, &to_table)?;
                    match usize::try_from(seq).ok().and_then(|i| pk.get(i).cloned()) {
                        Some(col) => col,
                        None => {
                            warn!(
                                table,
                                to_table = %to_table,
                                from_column = %from_column,
                                "foreign key target column unresolved, ignoring"
                            );
                            continue;
                        }
                    }
                }
            };
            keys.push(ForeignKey {
                from_column,
                to_table,
                to_column,
            });
        }
        Ok(keys)
    }

    fn sample_row(&self, table: &str) -> ExemplarResult<Option<Row>> {
        let rows = self.execute(&format!("SELECT * FROM {} LIMIT 1", ident(table)))?;
        Ok(rows.into_iter().next())
    }

    fn execute(&self, sql: &str) -> ExemplarResult<Vec<Row>> {
        let conn = self.connect()?;
        let statement = sql.trim().trim_end_matches(';');
        let mut stmt = conn.prepare(statement).map_err(execution_failed)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();

        let mut rows = stmt.query([]).map_err(execution_failed)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(execution_failed)? {
            let mut values = Vec::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                let value = row.get_ref(i).map_err(execution_failed)?;
                values.push((name.clone(), to_sql_value(value)));
            }
            out.push(Row::new(values));
        }
        debug!(rows = out.len(), "statement executed");
        Ok(out)
    }

    fn db_id(&self) -> &str {
        &self.db_id
    }
}

fn to_sql_value(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(v) => SqlValue::Integer(v),
        ValueRef::Real(v) => SqlValue::Real(v),
        ValueRef::Text(bytes) => SqlValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
    }
}

fn introspection_failed(table: &str, e: rusqlite::Error) -> SchemaError {
    SchemaError::IntrospectionFailed {
        table: table.to_string(),
        reason: e.to_string(),
    }
}

fn execution_failed(e: rusqlite::Error) -> SchemaError {
    SchemaError::ExecutionFailed {
        reason: e.to_string(),
    }
}
