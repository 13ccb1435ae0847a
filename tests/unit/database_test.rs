//! Unit tests for the Clipster database layer (connection, migrations, SQLite storage).

use clipster::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use clipster::database::{Database, FolderStorage, ClipStorage, SqliteStorage};
use clipster::types::clip::{Clip, UrlMetadata};
use clipster::types::errors::StorageError;
use clipster::types::folder::Folder;

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_all_tables() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    for table in &["folders", "clips", "schema_version"] {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Table '{}' should exist after migrations", table);
    }
    assert_eq!(get_schema_version(conn), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_reopening_file_keeps_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clipster.db");
    drop(Database::open(&path).unwrap());
    let db = Database::open(&path).unwrap();
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
    assert_eq!(db.schema_version(), CURRENT_SCHEMA_VERSION);
}

#[tokio::test]
async fn test_folder_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clipster.db");
    let books = Folder::new("Books", None);
    {
        let storage = SqliteStorage::new(Database::open(&path).unwrap());
        storage.insert_folder(&books).await.unwrap();
    }
    let storage = SqliteStorage::open(&path).unwrap();
    assert_eq!(storage.fetch_folder(books.id).await.unwrap(), books);
}

#[tokio::test]
async fn test_nested_folder_is_returned_with_subtree() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let books = Folder::new("Books", None);
    let fiction = Folder::new("Fiction", Some(&books));
    let clip = Clip::new(fiction.id, UrlMetadata::new("https://example.com", "Example"), "memo");
    storage.insert_folder(&books).await.unwrap();
    storage.insert_folder(&fiction).await.unwrap();
    storage.insert_clip(&clip).await.unwrap();

    let loaded = storage.fetch_folder(books.id).await.unwrap();
    assert_eq!(loaded.folders.len(), 1);
    assert_eq!(loaded.folders[0].id, fiction.id);
    assert_eq!(loaded.folders[0].clips, vec![clip]);
}

#[tokio::test]
async fn test_missing_folder_is_not_found() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let err = storage.fetch_folder(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn test_insert_rejects_wrong_depth() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let books = Folder::new("Books", None);
    storage.insert_folder(&books).await.unwrap();

    let mut fiction = Folder::new("Fiction", Some(&books));
    fiction.depth = 5;
    let err = storage.insert_folder(&fiction).await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidHierarchy(_)));
}

#[tokio::test]
async fn test_moving_folder_under_its_child_is_rejected() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let books = Folder::new("Books", None);
    let fiction = Folder::new("Fiction", Some(&books));
    storage.insert_folder(&books).await.unwrap();
    storage.insert_folder(&fiction).await.unwrap();

    let moved = Folder {
        parent_folder_id: Some(fiction.id),
        depth: fiction.depth + 1,
        ..books.clone()
    };
    let err = storage.update_folder(&moved).await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidHierarchy(_)));
}

#[tokio::test]
async fn test_moving_folder_updates_descendant_depths() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let books = Folder::new("Books", None);
    let fiction = Folder::new("Fiction", Some(&books));
    let classics = Folder::new("Classics", Some(&fiction));
    let archive = Folder::new("Archive", None);
    for folder in [&books, &fiction, &classics, &archive] {
        storage.insert_folder(folder).await.unwrap();
    }

    let moved = Folder {
        parent_folder_id: Some(archive.id),
        depth: 1,
        ..books.clone()
    };
    storage.update_folder(&moved).await.unwrap();

    assert_eq!(storage.fetch_folder(fiction.id).await.unwrap().depth, 2);
    assert_eq!(storage.fetch_folder(classics.id).await.unwrap().depth, 3);
}

#[tokio::test]
async fn test_clip_requires_existing_folder() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let clip = Clip::new(uuid::Uuid::new_v4(), UrlMetadata::new("https://x.example", "X"), "");
    assert!(storage.insert_clip(&clip).await.is_err());
}
