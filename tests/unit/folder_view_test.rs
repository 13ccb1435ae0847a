//! Unit tests for the folder view screen.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clipster::app::App;
use clipster::database::FolderStorage;
use clipster::managers::clip_repository::ClipRepositoryTrait;
use clipster::managers::folder_repository::FolderRepositoryTrait;
use clipster::reducer::Store;
use clipster::screens::folder_view::{FolderViewAction, FolderViewReducer, FolderViewState};
use clipster::types::clip::{Clip, UrlMetadata};
use clipster::types::errors::DomainError;
use clipster::types::folder::Folder;
use clipster::types::settings::AppSettings;
use tokio::sync::oneshot;
use uuid::Uuid;

struct Fixture {
    app: App,
    home: Folder,
    child: Folder,
    clip: Clip,
}

async fn setup(warm: bool) -> Fixture {
    let settings = AppSettings {
        warm_cache_on_startup: warm,
        ..AppSettings::default()
    };
    let app = App::in_memory(settings).unwrap();
    app.startup().await;
    let home = Folder::new("Home", None);
    let child = Folder::new("Child", Some(&home));
    let clip = Clip::new(home.id, UrlMetadata::new("https://example.com", "Example"), "");
    app.folders.insert_folder(&home).await.unwrap();
    app.folders.insert_folder(&child).await.unwrap();
    app.clips.insert_clip(&clip).await.unwrap();
    let home = app.folders.fetch_folder(home.id).await.unwrap();
    Fixture {
        app,
        home,
        child,
        clip,
    }
}

/// Reads through to the real repository, then sits on the first
/// `fetch_folder` result until released.
struct HeldFetch {
    inner: Arc<dyn FolderRepositoryTrait>,
    hold: Mutex<Option<(oneshot::Sender<()>, oneshot::Receiver<()>)>>,
}

impl HeldFetch {
    /// Returns the repository, a receiver fired once the held read is done,
    /// and the sender that releases it.
    fn new(
        inner: Arc<dyn FolderRepositoryTrait>,
    ) -> (Arc<Self>, oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (fetched, on_fetched) = oneshot::channel();
        let (release, on_release) = oneshot::channel();
        let repository = Arc::new(Self {
            inner,
            hold: Mutex::new(Some((fetched, on_release))),
        });
        (repository, on_fetched, release)
    }
}

#[async_trait]
impl FolderRepositoryTrait for HeldFetch {
    async fn fetch_folder(&self, id: Uuid) -> Result<Folder, DomainError> {
        let result = self.inner.fetch_folder(id).await;
        let hold = self.hold.lock().unwrap().take();
        if let Some((fetched, release)) = hold {
            let _ = fetched.send(());
            let _ = release.await;
        }
        result
    }

    async fn fetch_all_folders(&self) -> Result<Vec<Folder>, DomainError> {
        self.inner.fetch_all_folders().await
    }

    async fn fetch_top_level_folders(&self) -> Result<Vec<Folder>, DomainError> {
        self.inner.fetch_top_level_folders().await
    }

    async fn insert_folder(&self, folder: &Folder) -> Result<(), DomainError> {
        self.inner.insert_folder(folder).await
    }

    async fn update_folder(&self, folder: &Folder) -> Result<(), DomainError> {
        self.inner.update_folder(folder).await
    }

    async fn delete_folder(&self, folder: &Folder) -> Result<(), DomainError> {
        self.inner.delete_folder(folder).await
    }
}

#[tokio::test]
async fn test_reload_lists_contents() {
    let fx = setup(true).await;
    let mut stale = fx.home.shallow();
    stale.title = "Stale title".to_string();
    let store = fx.app.folder_view(stale);
    assert!(store.state().is_empty());

    store.send(FolderViewAction::Reload);
    let state = store.wait_until(|s| !s.is_loading).await;
    assert_eq!(state.title(), "Home");
    assert_eq!(state.folders().len(), 1);
    assert_eq!(state.clips().len(), 1);
}

#[tokio::test]
async fn test_reload_of_missing_folder_alerts() {
    let fx = setup(true).await;
    let store = fx.app.folder_view(Folder::new("Gone", None));
    store.send(FolderViewAction::Reload);
    let state = store.wait_until(|s| !s.is_loading).await;
    assert_eq!(
        state.alert_message,
        Some(DomainError::EntityNotFound.to_string())
    );
}

#[tokio::test]
async fn test_visit_records_timestamp() {
    let fx = setup(false).await;
    let store = fx.app.folder_view(fx.home.clone());
    store.send(FolderViewAction::VisitClip(fx.clip.id));
    let state = store
        .wait_until(|s| s.folder.clips[0].last_visited_at.is_some())
        .await;

    let stored = fx.app.clips.fetch_clip(fx.clip.id).await.unwrap();
    assert_eq!(stored.last_visited_at, state.folder.clips[0].last_visited_at);
}

#[tokio::test]
async fn test_deletes_run_independently() {
    let fx = setup(true).await;
    let store = fx.app.folder_view(fx.home.clone());
    store.send(FolderViewAction::DeleteFolder(fx.child.id));
    store.send(FolderViewAction::DeleteClip(fx.clip.id));

    let state = store.wait_until(|s| s.is_empty()).await;
    assert!(state.folders().is_empty());
    assert!(state.clips().is_empty());

    let reloaded = fx.app.folders.fetch_folder(fx.home.id).await.unwrap();
    assert!(reloaded.visible_folders().next().is_none());
    assert!(reloaded.visible_clips().next().is_none());
    assert_eq!(
        fx.app.folders.fetch_folder(fx.child.id).await,
        Err(DomainError::EntityNotFound)
    );
}

#[tokio::test]
async fn test_unknown_clip_is_ignored() {
    let fx = setup(true).await;
    let store = fx.app.folder_view(fx.home.clone());
    store.send(FolderViewAction::DeleteClip(uuid::Uuid::new_v4()));
    assert_eq!(store.state().folder, fx.home);
}

#[tokio::test]
async fn test_late_reload_keeps_deleted_folder_hidden() {
    let fx = setup(true).await;
    let (folders, on_fetched, release) = HeldFetch::new(fx.app.folders.clone());
    let store = Store::new(
        FolderViewReducer::new(folders, fx.app.clips.clone()),
        FolderViewState::new(fx.home.clone()),
    );

    // The reload reads the folder while the child is still live.
    store.send(FolderViewAction::Reload);
    on_fetched.await.unwrap();

    store.send(FolderViewAction::DeleteFolder(fx.child.id));
    store.wait_until(|s| s.folders().is_empty()).await;

    release.send(()).unwrap();
    let state = store.wait_until(|s| !s.is_loading).await;

    assert!(state.folders().is_empty());
    assert_eq!(state.clips().len(), 1);
    assert!(fx.app.storage.fetch_folder(fx.child.id).await.unwrap().is_deleted());
}

#[tokio::test]
async fn test_late_reload_keeps_deleted_clip_hidden() {
    let fx = setup(false).await;
    let (folders, on_fetched, release) = HeldFetch::new(fx.app.folders.clone());
    let store = Store::new(
        FolderViewReducer::new(folders, fx.app.clips.clone()),
        FolderViewState::new(fx.home.clone()),
    );

    store.send(FolderViewAction::Reload);
    on_fetched.await.unwrap();
    store.send(FolderViewAction::DeleteClip(fx.clip.id));
    store.wait_until(|s| s.clips().is_empty()).await;

    release.send(()).unwrap();
    let state = store.wait_until(|s| !s.is_loading).await;

    assert!(state.clips().is_empty());
    assert_eq!(state.folders().len(), 1);
}
