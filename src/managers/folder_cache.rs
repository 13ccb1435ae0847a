//! In-memory folder cache.
//!
//! Holds one materialized [`FolderTree`] behind a `tokio::sync::RwLock`.
//! Every write takes the lock exclusively, so readers never see a tree that is
//! halfway through an upsert.
//!
//! The cache does not know about storage, but it can run a caller's storage
//! future under its write lock ([`FolderCache::write_folder`],
//! [`FolderCache::populate_from`]). Storage commits and cache updates then
//! happen in one order, and a warm-up cannot miss a write that landed while
//! its forest was loading.

use std::future::Future;

use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::folder_tree::FolderTree;
use crate::types::clip::Clip;
use crate::types::folder::Folder;

#[derive(Debug, Default)]
struct CacheState {
    initialized: bool,
    tree: FolderTree,
}

/// Single-writer cache of the whole folder tree with an initialization gate.
#[derive(Debug, Default)]
pub struct FolderCache {
    state: RwLock<CacheState>,
}

impl FolderCache {
    /// Creates an empty, uninitialized cache.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.initialized
    }

    /// Replaces the cached tree with `forest` and opens the gate.
    ///
    /// The new tree is built before the lock is taken, so population is
    /// all-or-nothing from a reader's point of view.
    pub async fn populate(&self, forest: &[Folder]) {
        let tree = FolderTree::from_forest(forest);
        let count = tree.len();
        let mut state = self.state.write().await;
        state.tree = tree;
        state.initialized = true;
        info!(folders = count, "folder cache populated");
    }

    /// Loads a forest with `load` and swaps it in, holding the write lock for
    /// the whole load. On error the cache is left as it was.
    ///
    /// Returns the number of top-level folders loaded.
    pub async fn populate_from<E, Fut>(&self, load: Fut) -> Result<usize, E>
    where
        Fut: Future<Output = Result<Vec<Folder>, E>>,
    {
        let mut state = self.state.write().await;
        let forest = load.await?;
        state.tree = FolderTree::from_forest(&forest);
        state.initialized = true;
        info!(folders = state.tree.len(), "folder cache populated");
        Ok(forest.len())
    }

    /// Drops the cached tree and closes the gate.
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.tree = FolderTree::new();
        state.initialized = false;
        debug!("folder cache invalidated");
    }

    /// Looks up a folder anywhere in the tree.
    pub async fn folder(&self, id: &Uuid) -> Option<Folder> {
        self.state.read().await.tree.folder(id)
    }

    /// Every cached folder, tombstoned ones included.
    pub async fn all_folders(&self) -> Vec<Folder> {
        self.state.read().await.tree.all_folders()
    }

    /// Upserts a folder at the position implied by its parent ID.
    pub async fn set_folder(&self, folder: &Folder) {
        self.state.write().await.tree.upsert_folder(folder);
        debug!(folder_id = %folder.id, "folder cached");
    }

    /// Runs the storage write `write` under the write lock and, once it
    /// succeeds, upserts `folder` if the cache is initialized.
    pub async fn write_folder<E, Fut>(&self, folder: &Folder, write: Fut) -> Result<(), E>
    where
        Fut: Future<Output = Result<(), E>>,
    {
        let mut state = self.state.write().await;
        write.await?;
        if state.initialized {
            state.tree.upsert_folder(folder);
            debug!(folder_id = %folder.id, "folder written through");
        }
        Ok(())
    }

    pub async fn clip(&self, id: &Uuid) -> Option<Clip> {
        self.state.read().await.tree.clip(id)
    }

    /// Upserts a clip into its folder.
    pub async fn set_clip(&self, clip: &Clip) {
        let stored = self.state.write().await.tree.upsert_clip(clip);
        debug!(clip_id = %clip.id, stored, "clip cached");
    }

    /// Clip counterpart of [`FolderCache::write_folder`].
    pub async fn write_clip<E, Fut>(&self, clip: &Clip, write: Fut) -> Result<(), E>
    where
        Fut: Future<Output = Result<(), E>>,
    {
        let mut state = self.state.write().await;
        write.await?;
        if state.initialized {
            let stored = state.tree.upsert_clip(clip);
            debug!(clip_id = %clip.id, stored, "clip written through");
        }
        Ok(())
    }
}
