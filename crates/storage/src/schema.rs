use rusqlite::Connection;

use crate::error::StorageError;

pub const SCHEMA_VERSION: i32 = 1;

pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
    ",
    )?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at INTEGER NOT NULL
);
INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, unixepoch());

CREATE TABLE IF NOT EXISTS shows (
    id INTEGER PRIMARY KEY,
    name TEXT,
    season INTEGER,
    episode INTEGER,
    status TEXT,
    date_started TEXT,
    date_finished TEXT,
    last_updated TEXT
);
CREATE INDEX IF NOT EXISTS idx_shows_name ON shows (name);

CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY,
    name TEXT,
    status TEXT,
    date_watched TEXT,
    last_updated TEXT
);
CREATE INDEX IF NOT EXISTS idx_movies_name ON movies (name);

CREATE TABLE IF NOT EXISTS webcomics (
    id INTEGER PRIMARY KEY,
    name TEXT,
    last_updated TEXT
);
CREATE INDEX IF NOT EXISTS idx_webcomics_name ON webcomics (name);
";
