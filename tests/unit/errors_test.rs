use clipster::types::errors::*;
use rstest::rstest;

// === DomainError Tests ===

#[rstest]
#[case(DomainError::EntityNotFound, "The requested item could not be found")]
#[case(DomainError::FetchFailed, "Failed to load data")]
#[case(DomainError::InsertFailed, "Failed to save the new item")]
#[case(DomainError::UpdateFailed, "Failed to save changes")]
#[case(DomainError::DeleteFailed, "Failed to delete the item")]
fn domain_error_display(#[case] err: DomainError, #[case] expected: &str) {
    assert_eq!(err.to_string(), expected);
}

#[test]
fn domain_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(DomainError::FetchFailed);
    assert!(err.source().is_none());
}

// === StorageError Tests ===

#[test]
fn storage_error_not_found_display() {
    let err = StorageError::NotFound("folder-1".to_string());
    assert_eq!(err.to_string(), "Entity not found in storage: folder-1");
}

#[test]
fn storage_error_hierarchy_display() {
    let err = StorageError::InvalidHierarchy("cycle".to_string());
    assert_eq!(err.to_string(), "Invalid folder hierarchy: cycle");
}

#[test]
fn storage_error_from_rusqlite() {
    let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, StorageError::Database(_)));
}

// === SettingsError Tests ===

#[test]
fn settings_error_invalid_key_display() {
    let err = SettingsError::InvalidKey("".to_string());
    assert_eq!(err.to_string(), "Invalid settings key: ");
}

#[test]
fn settings_error_io_display() {
    let err = SettingsError::IoError("disk full".to_string());
    assert_eq!(err.to_string(), "Settings I/O error: disk full");
}
