//! v001: collections and their entries.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS collections (
    name             TEXT PRIMARY KEY,
    embedding_model  TEXT NOT NULL,
    dimensions       INTEGER NOT NULL,
    last_update      REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS entries (
    collection  TEXT NOT NULL,
    id          INTEGER NOT NULL,
    embedding   BLOB NOT NULL,
    db_id       TEXT NOT NULL DEFAULT '',
    difficulty  TEXT,
    has_sql     INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (collection, id),
    FOREIGN KEY (collection) REFERENCES collections(name) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_entries_db_id ON entries(collection, db_id);
CREATE INDEX IF NOT EXISTS idx_entries_difficulty ON entries(collection, difficulty);
";
