//! Clip Repository for Clipster.
//!
//! Same consistency rules as the folder repository: cache-first reads once the
//! cache is initialized, storage-first writes mirrored into the cache on success.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use super::folder_cache::FolderCache;
use super::folder_repository::map_fetch_error;
use crate::database::storage::ClipStorage;
use crate::types::clip::Clip;
use crate::types::errors::{DomainError, StorageError};

/// Trait defining clip data access.
#[async_trait]
pub trait ClipRepositoryTrait: Send + Sync {
    async fn fetch_clip(&self, id: Uuid) -> Result<Clip, DomainError>;
    /// Live clips of one folder.
    async fn fetch_clips(&self, folder_id: Uuid) -> Result<Vec<Clip>, DomainError>;
    async fn insert_clip(&self, clip: &Clip) -> Result<(), DomainError>;
    async fn update_clip(&self, clip: &Clip) -> Result<(), DomainError>;
    async fn delete_clip(&self, clip: &Clip) -> Result<(), DomainError>;
}

/// Clip repository mediating storage and cache.
pub struct ClipRepository {
    storage: Arc<dyn ClipStorage>,
    cache: Option<Arc<FolderCache>>,
}

impl ClipRepository {
    pub fn new(storage: Arc<dyn ClipStorage>, cache: Option<Arc<FolderCache>>) -> Self {
        Self { storage, cache }
    }

    async fn ready_cache(&self) -> Option<&FolderCache> {
        let cache = self.cache.as_deref()?;
        if cache.is_initialized().await {
            Some(cache)
        } else {
            None
        }
    }

    async fn write_through<Fut>(&self, clip: &Clip, write: Fut) -> Result<(), StorageError>
    where
        Fut: Future<Output = Result<(), StorageError>>,
    {
        match self.cache.as_deref() {
            Some(cache) => cache.write_clip(clip, write).await,
            None => write.await,
        }
    }
}

#[async_trait]
impl ClipRepositoryTrait for ClipRepository {
    async fn fetch_clip(&self, id: Uuid) -> Result<Clip, DomainError> {
        let clip = match self.ready_cache().await {
            Some(cache) => {
                debug!(clip_id = %id, "fetching clip from cache");
                cache.clip(&id).await.ok_or(DomainError::EntityNotFound)?
            }
            None => self.storage.fetch_clip(id).await.map_err(map_fetch_error)?,
        };
        if clip.is_deleted() {
            return Err(DomainError::EntityNotFound);
        }
        Ok(clip)
    }

    async fn fetch_clips(&self, folder_id: Uuid) -> Result<Vec<Clip>, DomainError> {
        let clips = match self.ready_cache().await {
            Some(cache) => cache
                .folder(&folder_id)
                .await
                .map(|f| f.clips)
                .unwrap_or_default(),
            None => self
                .storage
                .fetch_clips(folder_id)
                .await
                .map_err(map_fetch_error)?,
        };
        Ok(clips.into_iter().filter(|c| !c.is_deleted()).collect())
    }

    async fn insert_clip(&self, clip: &Clip) -> Result<(), DomainError> {
        self.write_through(clip, self.storage.insert_clip(clip))
            .await
            .map_err(|e| {
                warn!(clip_id = %clip.id, error = %e, "clip insert failed");
                DomainError::InsertFailed
            })
    }

    async fn update_clip(&self, clip: &Clip) -> Result<(), DomainError> {
        self.write_through(clip, self.storage.update_clip(clip))
            .await
            .map_err(|e| {
                warn!(clip_id = %clip.id, error = %e, "clip update failed");
                DomainError::UpdateFailed
            })
    }

    async fn delete_clip(&self, clip: &Clip) -> Result<(), DomainError> {
        self.write_through(clip, self.storage.delete_clip(clip))
            .await
            .map_err(|e| {
                warn!(clip_id = %clip.id, error = %e, "clip delete failed");
                DomainError::DeleteFailed
            })
    }
}
