//! Connection setup for the vector store.

pub mod pragmas;

use std::path::Path;

use exemplar_core::errors::StorageError;
use rusqlite::Connection;

use crate::migrations;

/// Open (or create) the store database, apply pragmas, and migrate.
pub fn open_store_connection(path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open(path).map_err(|e| StorageError::SqliteError {
        message: format!("failed to open {}: {e}", path.display()),
    })?;
    pragmas::apply_pragmas(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// In-memory store for tests and throwaway indices.
pub fn open_in_memory() -> Result<Connection, StorageError> {
    let conn = Connection::open_in_memory().map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}
