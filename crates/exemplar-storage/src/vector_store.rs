//! Durable vector collections.

use std::path::{Path, PathBuf};

use exemplar_core::errors::StorageError;
use exemplar_core::models::{EntryMetadata, MetadataFilter};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::backup;
use crate::codec::{decode_embedding, encode_embedding};
use crate::connection;

/// Database file created inside the store directory.
pub const STORE_FILE_NAME: &str = "vectors.db";

/// Collection-level metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionInfo {
    pub name: String,
    pub embedding_model: String,
    pub dimensions: usize,
    /// Corpus mtime (seconds since the epoch) the collection was built from.
    pub last_update: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorEntry {
    pub id: usize,
    pub embedding: Vec<f32>,
    pub metadata: EntryMetadata,
}

pub struct VectorStore {
    conn: Connection,
    path: Option<PathBuf>,
}

fn sql_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

impl VectorStore {
    /// Open the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir).map_err(|e| StorageError::StoreUnavailable {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        let path = dir.join(STORE_FILE_NAME);
        let conn = connection::open_store_connection(&path)?;
        debug!(path = %path.display(), "vector store opened");
        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            conn: connection::open_in_memory()?,
            path: None,
        })
    }

    /// Database file path; `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn collection(&self, name: &str) -> Result<Option<CollectionInfo>, StorageError> {
        self.conn
            .query_row(
                "SELECT name, embedding_model, dimensions, last_update
                 FROM collections WHERE name = ?1",
                params![name],
                |row| {
                    Ok(CollectionInfo {
                        name: row.get(0)?,
                        embedding_model: row.get(1)?,
                        dimensions: row.get::<_, i64>(2)? as usize,
                        last_update: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(sql_err)
    }

    pub fn list_collections(&self) -> Result<Vec<CollectionInfo>, StorageError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT name, embedding_model, dimensions, last_update
                 FROM collections ORDER BY name",
            )
            .map_err(sql_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CollectionInfo {
                    name: row.get(0)?,
                    embedding_model: row.get(1)?,
                    dimensions: row.get::<_, i64>(2)? as usize,
                    last_update: row.get(3)?,
                })
            })
            .map_err(sql_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
    }

    /// Create `info.name`, dropping any existing collection of that name.
    pub fn create_collection(&mut self, info: &CollectionInfo) -> Result<(), StorageError> {
        let tx = self.conn.transaction().map_err(sql_err)?;
        tx.execute("DELETE FROM collections WHERE name = ?1", params![info.name])
            .map_err(sql_err)?;
        insert_collection(&tx, info)?;
        tx.commit().map_err(sql_err)?;
        info!(
            collection = %info.name,
            model = %info.embedding_model,
            dims = info.dimensions,
            "collection created"
        );
        Ok(())
    }

    /// Snapshot every collection into the single file `dest`.
    pub fn backup_to(&self, dest: &Path) -> Result<(), StorageError> {
        backup::create_backup(&self.conn, dest)?;
        info!(dest = %dest.display(), "vector store backed up");
        Ok(())
    }

    /// Replace every collection with those in the snapshot at `src`.
    pub fn restore_from(&mut self, src: &Path) -> Result<(), StorageError> {
        backup::restore_from_backup(&mut self.conn, src)?;
        info!(src = %src.display(), "vector store restored");
        Ok(())
    }

    /// Returns whether a collection was removed.
    pub fn delete_collection(&mut self, name: &str) -> Result<bool, StorageError> {
        let n = self
            .conn
            .execute("DELETE FROM collections WHERE name = ?1", params![name])
            .map_err(sql_err)?;
        Ok(n > 0)
    }

    /// Insert or replace entries in one transaction.
    pub fn add_entries(&mut self, name: &str, entries: &[VectorEntry]) -> Result<usize, StorageError> {
        let info = self
            .collection(name)?
            .ok_or_else(|| StorageError::CollectionNotFound {
                name: name.to_string(),
            })?;

        let tx = self.conn.transaction().map_err(sql_err)?;
        insert_entries(&tx, &info, entries)?;
        tx.commit().map_err(sql_err)?;
        debug!(collection = %name, count = entries.len(), "entries added");
        Ok(entries.len())
    }

    /// Drop, recreate and fill a collection atomically. Readers see either
    /// the previous collection or the complete new one.
    pub fn replace_collection(
        &mut self,
        info: &CollectionInfo,
        entries: &[VectorEntry],
    ) -> Result<usize, StorageError> {
        let tx = self.conn.transaction().map_err(sql_err)?;
        tx.execute("DELETE FROM collections WHERE name = ?1", params![info.name])
            .map_err(sql_err)?;
        insert_collection(&tx, info)?;
        insert_entries(&tx, info, entries)?;
        tx.commit().map_err(sql_err)?;
        info!(
            collection = %info.name,
            model = %info.embedding_model,
            entries = entries.len(),
            "collection replaced"
        );
        Ok(entries.len())
    }

    pub fn count(&self, name: &str) -> Result<usize, StorageError> {
        let n: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM entries WHERE collection = ?1",
                params![name],
                |row| row.get(0),
            )
            .map_err(sql_err)?;
        Ok(n as usize)
    }

    pub fn get_entry(&self, name: &str, id: usize) -> Result<Option<VectorEntry>, StorageError> {
        self.conn
            .query_row(
                "SELECT id, embedding, db_id, difficulty, has_sql
                 FROM entries WHERE collection = ?1 AND id = ?2",
                params![name, id as i64],
                |row| {
                    Ok(VectorEntry {
                        id: row.get::<_, i64>(0)? as usize,
                        embedding: decode_embedding(&row.get::<_, Vec<u8>>(1)?),
                        metadata: EntryMetadata {
                            db_id: row.get(2)?,
                            difficulty: row.get(3)?,
                            has_sql: row.get(4)?,
                        },
                    })
                },
            )
            .optional()
            .map_err(sql_err)
    }

    /// The `k` entries nearest to `vector` by squared L2 distance among those
    /// matching `filter`, closest first. Ties resolve to the lower id.
    pub fn query(
        &self,
        name: &str,
        vector: &[f32],
        k: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<(usize, f64)>, StorageError> {
        if self.collection(name)?.is_none() {
            return Err(StorageError::CollectionNotFound {
                name: name.to_string(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, embedding FROM entries
                 WHERE collection = ?1
                   AND (?2 IS NULL OR db_id = ?2)
                   AND (?3 IS NULL OR difficulty = ?3)
                   AND (?4 IS NULL OR has_sql = ?4)",
            )
            .map_err(sql_err)?;
        let rows = stmt
            .query_map(
                params![name, filter.db_id, filter.difficulty, filter.has_sql],
                |row| {
                    let id = row.get::<_, i64>(0)? as usize;
                    let blob: Vec<u8> = row.get(1)?;
                    Ok((id, blob))
                },
            )
            .map_err(sql_err)?;

        let mut scored = Vec::new();
        for row in rows {
            let (id, blob) = row.map_err(sql_err)?;
            scored.push((id, squared_l2(vector, &decode_embedding(&blob))));
        }
        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);
        Ok(scored)
    }
}

fn insert_collection(conn: &Connection, info: &CollectionInfo) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO collections (name, embedding_model, dimensions, last_update)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            info.name,
            info.embedding_model,
            info.dimensions as i64,
            info.last_update
        ],
    )
    .map_err(sql_err)?;
    Ok(())
}

fn insert_entries(
    conn: &Connection,
    info: &CollectionInfo,
    entries: &[VectorEntry],
) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare(
            "INSERT OR REPLACE INTO entries
             (collection, id, embedding, db_id, difficulty, has_sql)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .map_err(sql_err)?;
    for entry in entries {
        if entry.embedding.len() != info.dimensions {
            return Err(StorageError::DimensionMismatch {
                id: entry.id,
                expected: info.dimensions,
                actual: entry.embedding.len(),
            });
        }
        stmt.execute(params![
            info.name,
            entry.id as i64,
            encode_embedding(&entry.embedding),
            entry.metadata.db_id,
            entry.metadata.difficulty,
            entry.metadata.has_sql,
        ])
        .map_err(sql_err)?;
    }
    Ok(())
}

fn squared_l2(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = *x as f64 - *y as f64;
            d * d
        })
        .sum()
}
