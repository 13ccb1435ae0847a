//! App Core for Clipster.
//!
//! Central struct wiring storage, cache and repositories, and handing out
//! screen stores that share them.

use std::error::Error;
use std::fs;
use std::sync::Arc;

use tracing::{info, warn};

use crate::database::sqlite_storage::SqliteStorage;
use crate::managers::clip_repository::{ClipRepository, ClipRepositoryTrait};
use crate::managers::folder_cache::FolderCache;
use crate::managers::folder_repository::{FolderRepository, FolderRepositoryTrait};
use crate::reducer::Store;
use crate::screens::edit_folder::{EditFolderMode, EditFolderReducer, EditFolderState};
use crate::screens::folder_selector::{
    FolderSelectorMode, FolderSelectorReducer, FolderSelectorState,
};
use crate::screens::folder_view::{FolderViewReducer, FolderViewState};
use crate::services::app_config;
use crate::services::cache_warmer::warm_cache;
use crate::types::folder::Folder;
use crate::types::settings::AppSettings;

/// Central application struct. Every repository shares one storage and one cache.
pub struct App {
    pub settings: AppSettings,
    pub storage: Arc<SqliteStorage>,
    pub cache: Arc<FolderCache>,
    pub folders: Arc<dyn FolderRepositoryTrait>,
    pub clips: Arc<dyn ClipRepositoryTrait>,
}

impl App {
    /// Opens the database named by `settings` (or the default data path).
    pub fn new(settings: AppSettings) -> Result<Self, Box<dyn Error>> {
        let path = app_config::database_path(&settings);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create data directory: {}", e))?;
        }
        let storage = SqliteStorage::open(&path)?;
        info!(path = %path.display(), "database opened");
        Ok(Self::with_storage(settings, storage))
    }

    /// Same wiring over a throwaway in-memory database.
    pub fn in_memory(settings: AppSettings) -> Result<Self, Box<dyn Error>> {
        Ok(Self::with_storage(settings, SqliteStorage::open_in_memory()?))
    }

    fn with_storage(settings: AppSettings, storage: SqliteStorage) -> Self {
        let storage = Arc::new(storage);
        let cache = Arc::new(FolderCache::new());
        let folders = Arc::new(FolderRepository::new(storage.clone(), Some(cache.clone())));
        let clips = Arc::new(ClipRepository::new(storage.clone(), Some(cache.clone())));
        Self {
            settings,
            storage,
            cache,
            folders,
            clips,
        }
    }

    /// Startup sequence: warm the cache if configured. A failed warm-up is
    /// logged and the repositories keep reading from storage.
    pub async fn startup(&self) {
        if !self.settings.warm_cache_on_startup {
            info!("cache warm-up disabled");
            return;
        }
        if let Err(e) = warm_cache(self.storage.as_ref(), &self.cache).await {
            warn!(error = %e, "starting without folder cache");
        }
    }

    pub fn edit_folder(&self, mode: EditFolderMode) -> Store<EditFolderReducer> {
        Store::new(
            EditFolderReducer::new(self.folders.clone()),
            EditFolderState::new(mode),
        )
    }

    pub fn folder_selector(&self, mode: FolderSelectorMode) -> Store<FolderSelectorReducer> {
        Store::new(
            FolderSelectorReducer::new(self.folders.clone()),
            FolderSelectorState::new(mode),
        )
    }

    pub fn folder_view(&self, folder: Folder) -> Store<FolderViewReducer> {
        Store::new(
            FolderViewReducer::new(self.folders.clone(), self.clips.clone()),
            FolderViewState::new(folder),
        )
    }
}
