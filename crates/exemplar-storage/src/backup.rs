//! Store snapshots through SQLite's online backup API.

use std::path::Path;
use std::time::Duration;

use exemplar_core::errors::StorageError;
use rusqlite::backup::Backup;
use rusqlite::Connection;

use crate::migrations::{self, current_version};

const PAGES_PER_STEP: i32 = 100;
const STEP_PAUSE: Duration = Duration::from_millis(10);

fn backup_err(stage: &str, e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: format!("{stage}: {e}"),
    }
}

/// Copy the whole database behind `conn` into a single file at `dest`,
/// overwriting it if present.
pub fn create_backup(conn: &Connection, dest: &Path) -> Result<(), StorageError> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StorageError::StoreUnavailable {
            path: parent.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    let mut dst = Connection::open(dest).map_err(|e| backup_err("open backup dest", e))?;
    let backup = Backup::new(conn, &mut dst).map_err(|e| backup_err("init backup", e))?;
    backup
        .run_to_completion(PAGES_PER_STEP, STEP_PAUSE, None)
        .map_err(|e| backup_err("run backup", e))?;
    Ok(())
}

/// Replace the database behind `conn` with the snapshot at `src`.
///
/// The snapshot must exist and carry the store schema; an arbitrary SQLite
/// file is refused before anything is overwritten. Older snapshots are
/// migrated forward after the copy.
pub fn restore_from_backup(conn: &mut Connection, src: &Path) -> Result<(), StorageError> {
    let unusable = |reason: String| StorageError::StoreUnavailable {
        path: src.display().to_string(),
        reason,
    };
    if !src.is_file() {
        return Err(unusable("no such snapshot file".to_string()));
    }
    let source = Connection::open(src).map_err(|e| unusable(e.to_string()))?;
    if current_version(&source)? == 0 {
        return Err(unusable("not a vector store snapshot".to_string()));
    }

    let backup = Backup::new(&source, conn).map_err(|e| backup_err("init restore", e))?;
    backup
        .run_to_completion(PAGES_PER_STEP, STEP_PAUSE, None)
        .map_err(|e| backup_err("run restore", e))?;
    drop(backup);

    migrations::run_migrations(conn)
}
