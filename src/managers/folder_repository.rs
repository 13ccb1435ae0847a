//! Folder Repository for Clipster.
//!
//! Implements `FolderRepositoryTrait` on top of a [`FolderStorage`] and an
//! optional [`FolderCache`]:
//!
//! - reads are served from the cache once it is initialized, otherwise from
//!   storage;
//! - writes always go to storage first, and only a successful write is
//!   mirrored into an initialized cache. The cache runs the storage write
//!   under its own lock, so two writes reach storage and cache in the same
//!   order.
//!
//! The repository holds no folder state of its own. Results are the same
//! whether or not a cache is plugged in.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use super::folder_cache::FolderCache;
use crate::database::storage::FolderStorage;
use crate::types::errors::{DomainError, StorageError};
use crate::types::folder::Folder;

/// Trait defining folder data access for screens and services.
#[async_trait]
pub trait FolderRepositoryTrait: Send + Sync {
    /// Fetches one live folder with its subtree.
    async fn fetch_folder(&self, id: Uuid) -> Result<Folder, DomainError>;
    /// Every live folder, nested ones included.
    async fn fetch_all_folders(&self) -> Result<Vec<Folder>, DomainError>;
    /// Live folders without a parent.
    async fn fetch_top_level_folders(&self) -> Result<Vec<Folder>, DomainError>;
    async fn insert_folder(&self, folder: &Folder) -> Result<(), DomainError>;
    async fn update_folder(&self, folder: &Folder) -> Result<(), DomainError>;
    /// Persists `folder`, which is expected to carry its tombstone.
    async fn delete_folder(&self, folder: &Folder) -> Result<(), DomainError>;
}

/// Folder repository mediating storage and cache.
pub struct FolderRepository {
    storage: Arc<dyn FolderStorage>,
    cache: Option<Arc<FolderCache>>,
}

/// Maps a storage read failure. A storage miss looks exactly like a cache miss.
pub(crate) fn map_fetch_error(e: StorageError) -> DomainError {
    match e {
        StorageError::NotFound(_) => DomainError::EntityNotFound,
        other => {
            warn!(error = %other, "storage fetch failed");
            DomainError::FetchFailed
        }
    }
}

impl FolderRepository {
    pub fn new(storage: Arc<dyn FolderStorage>, cache: Option<Arc<FolderCache>>) -> Self {
        Self { storage, cache }
    }

    /// Returns the cache only when it is present and initialized.
    async fn ready_cache(&self) -> Option<&FolderCache> {
        let cache = self.cache.as_deref()?;
        if cache.is_initialized().await {
            Some(cache)
        } else {
            None
        }
    }

    async fn write_through<Fut>(&self, folder: &Folder, write: Fut) -> Result<(), StorageError>
    where
        Fut: Future<Output = Result<(), StorageError>>,
    {
        match self.cache.as_deref() {
            Some(cache) => cache.write_folder(folder, write).await,
            None => write.await,
        }
    }
}

#[async_trait]
impl FolderRepositoryTrait for FolderRepository {
    async fn fetch_folder(&self, id: Uuid) -> Result<Folder, DomainError> {
        let folder = match self.ready_cache().await {
            Some(cache) => {
                debug!(folder_id = %id, "fetching folder from cache");
                cache.folder(&id).await.ok_or(DomainError::EntityNotFound)?
            }
            None => {
                debug!(folder_id = %id, "fetching folder from storage");
                self.storage.fetch_folder(id).await.map_err(map_fetch_error)?
            }
        };
        if folder.is_deleted() {
            return Err(DomainError::EntityNotFound);
        }
        Ok(folder)
    }

    async fn fetch_all_folders(&self) -> Result<Vec<Folder>, DomainError> {
        let folders = match self.ready_cache().await {
            Some(cache) => cache.all_folders().await,
            None => self
                .storage
                .fetch_all_folders()
                .await
                .map_err(map_fetch_error)?,
        };
        Ok(folders.into_iter().filter(|f| !f.is_deleted()).collect())
    }

    async fn fetch_top_level_folders(&self) -> Result<Vec<Folder>, DomainError> {
        let folders = match self.ready_cache().await {
            Some(cache) => cache.all_folders().await,
            None => self
                .storage
                .fetch_top_level_folders()
                .await
                .map_err(map_fetch_error)?,
        };
        Ok(folders
            .into_iter()
            .filter(|f| f.is_top_level() && !f.is_deleted())
            .collect())
    }

    async fn insert_folder(&self, folder: &Folder) -> Result<(), DomainError> {
        self.write_through(folder, self.storage.insert_folder(folder))
            .await
            .map_err(|e| {
                warn!(folder_id = %folder.id, error = %e, "folder insert failed");
                DomainError::InsertFailed
            })
    }

    async fn update_folder(&self, folder: &Folder) -> Result<(), DomainError> {
        self.write_through(folder, self.storage.update_folder(folder))
            .await
            .map_err(|e| {
                warn!(folder_id = %folder.id, error = %e, "folder update failed");
                DomainError::UpdateFailed
            })
    }

    async fn delete_folder(&self, folder: &Folder) -> Result<(), DomainError> {
        self.write_through(folder, self.storage.delete_folder(folder))
            .await
            .map_err(|e| {
                warn!(folder_id = %folder.id, error = %e, "folder delete failed");
                DomainError::DeleteFailed
            })
    }
}
