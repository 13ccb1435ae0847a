//! Durable storage contract.
//!
//! Storage is authoritative. Implementations report failures with
//! [`StorageError`]; the repositories erase those into domain errors.

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::clip::Clip;
use crate::types::errors::StorageError;
use crate::types::folder::Folder;

/// CRUD operations for folders.
///
/// Fetches return folders with their nested subtree. `delete_folder` writes
/// the entity with its tombstone set; nothing is physically removed.
#[async_trait]
pub trait FolderStorage: Send + Sync {
    async fn fetch_folder(&self, id: Uuid) -> Result<Folder, StorageError>;
    /// Every non-deleted folder, nested ones included.
    async fn fetch_all_folders(&self) -> Result<Vec<Folder>, StorageError>;
    /// Non-deleted folders without a parent.
    async fn fetch_top_level_folders(&self) -> Result<Vec<Folder>, StorageError>;
    /// Every top-level folder, tombstoned or not, with its complete subtree.
    /// Used to populate caches.
    async fn fetch_forest(&self) -> Result<Vec<Folder>, StorageError>;
    async fn insert_folder(&self, folder: &Folder) -> Result<(), StorageError>;
    async fn update_folder(&self, folder: &Folder) -> Result<(), StorageError>;
    async fn delete_folder(&self, folder: &Folder) -> Result<(), StorageError>;
}

/// CRUD operations for clips.
#[async_trait]
pub trait ClipStorage: Send + Sync {
    async fn fetch_clip(&self, id: Uuid) -> Result<Clip, StorageError>;
    /// Non-deleted clips of one folder.
    async fn fetch_clips(&self, folder_id: Uuid) -> Result<Vec<Clip>, StorageError>;
    async fn insert_clip(&self, clip: &Clip) -> Result<(), StorageError>;
    async fn update_clip(&self, clip: &Clip) -> Result<(), StorageError>;
    async fn delete_clip(&self, clip: &Clip) -> Result<(), StorageError>;
}
