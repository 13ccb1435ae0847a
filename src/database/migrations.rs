//! Schema migrations for the Clipster SQLite database.
//!
//! Uses a `schema_version` table to track which migrations have been applied.
//! Each migration runs exactly once and is recorded with a timestamp.

use rusqlite::Connection;

use crate::types::now_millis;

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Returns the current schema version from the database (0 if table doesn't exist).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// Safe to call on every startup.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    // Enable WAL and foreign keys (always, not versioned)
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "Initial schema: folders and clips")?;
    }

    if current < 2 {
        migration_v2(conn)?;
        record_version(conn, 2, "Index parent and owner columns")?;
    }

    Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, now_millis(), description],
    )?;
    Ok(())
}

/// V1: folder tree and clips. Soft deletes live in `deleted_at`.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS folders (
            id TEXT PRIMARY KEY,
            parent_folder_id TEXT,
            title TEXT NOT NULL,
            depth INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            deleted_at INTEGER,
            FOREIGN KEY (parent_folder_id) REFERENCES folders(id)
        );

        CREATE TABLE IF NOT EXISTS clips (
            id TEXT PRIMARY KEY,
            folder_id TEXT NOT NULL,
            url TEXT NOT NULL,
            url_title TEXT NOT NULL,
            thumbnail_image_url TEXT,
            screenshot_data BLOB,
            url_created_at INTEGER NOT NULL,
            url_updated_at INTEGER NOT NULL,
            url_deleted_at INTEGER,
            memo TEXT NOT NULL DEFAULT '',
            last_visited_at INTEGER,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            deleted_at INTEGER,
            FOREIGN KEY (folder_id) REFERENCES folders(id)
        );
        ",
    )
}

/// V2: indexes for child and clip listings.
fn migration_v2(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_folders_parent ON folders(parent_folder_id);
        CREATE INDEX IF NOT EXISTS idx_folders_deleted ON folders(deleted_at);
        CREATE INDEX IF NOT EXISTS idx_clips_folder ON clips(folder_id);
        ",
    )
}
