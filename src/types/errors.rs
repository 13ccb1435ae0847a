use std::fmt;

// === DomainError ===

/// Failures surfaced by the repositories.
///
/// Storage causes are erased at the repository boundary; only the kind of
/// operation that failed survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    /// No live entity with the requested ID exists.
    EntityNotFound,
    /// Reading from storage failed.
    FetchFailed,
    /// Writing a new entity to storage failed.
    InsertFailed,
    /// Writing a changed entity to storage failed.
    UpdateFailed,
    /// Writing a tombstone to storage failed.
    DeleteFailed,
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::EntityNotFound => write!(f, "The requested item could not be found"),
            DomainError::FetchFailed => write!(f, "Failed to load data"),
            DomainError::InsertFailed => write!(f, "Failed to save the new item"),
            DomainError::UpdateFailed => write!(f, "Failed to save changes"),
            DomainError::DeleteFailed => write!(f, "Failed to delete the item"),
        }
    }
}

impl std::error::Error for DomainError {}

// === StorageError ===

/// Errors raised by a durable storage backend.
#[derive(Debug)]
pub enum StorageError {
    /// Entity with the given ID does not exist in storage.
    NotFound(String),
    /// The underlying database rejected the operation.
    Database(String),
    /// The write would break the folder tree (missing parent, cycle, tombstoned parent).
    InvalidHierarchy(String),
    /// The connection lock was poisoned by a panicking writer.
    LockPoisoned,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound(id) => write!(f, "Entity not found in storage: {}", id),
            StorageError::Database(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::InvalidHierarchy(msg) => {
                write!(f, "Invalid folder hierarchy: {}", msg)
            }
            StorageError::LockPoisoned => write!(f, "Storage connection lock poisoned"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
