//! Opening the Clipster database.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use tracing::debug;

use super::migrations;

/// How long a write waits on another process holding the file lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A migrated SQLite connection holding the folder and clip tables.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens or creates the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::migrated(conn)
    }

    /// Throwaway database, gone once dropped.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::migrated(Connection::open_in_memory()?)
    }

    fn migrated(conn: Connection) -> Result<Self, rusqlite::Error> {
        migrations::run_all(&conn)?;
        let db = Self { conn };
        debug!(schema_version = db.schema_version(), "database ready");
        Ok(db)
    }

    pub fn schema_version(&self) -> i32 {
        migrations::get_schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
