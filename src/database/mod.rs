//! Clipster storage layer.
//!
//! Defines the durable storage contract consumed by the repositories and
//! its SQLite implementation.
//!
//! # Usage
//!
//! ```no_run
//! use clipster::database::{Database, SqliteStorage};
//!
//! // Open a persistent database
//! let db = Database::open("clipster.db").expect("failed to open database");
//! let storage = SqliteStorage::new(db);
//!
//! // Or use an in-memory database for testing
//! let storage = SqliteStorage::open_in_memory().expect("failed to open in-memory database");
//! ```

pub mod connection;
pub mod migrations;
pub mod sqlite_storage;
pub mod storage;

pub use connection::Database;
pub use sqlite_storage::SqliteStorage;
pub use storage::{ClipStorage, FolderStorage};
