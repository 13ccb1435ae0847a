//! Unit tests for the edit-folder screen driven through its Store.

use std::sync::Arc;

use clipster::app::App;
use clipster::database::SqliteStorage;
use clipster::managers::folder_repository::{FolderRepository, FolderRepositoryTrait};
use clipster::reducer::Store;
use clipster::screens::edit_folder::{
    EditFolderAction, EditFolderMode, EditFolderReducer, EditFolderState,
};
use clipster::types::errors::DomainError;
use clipster::types::folder::Folder;
use clipster::types::settings::AppSettings;

async fn app() -> App {
    let app = App::in_memory(AppSettings::default()).unwrap();
    app.startup().await;
    app
}

async fn save(store: &Store<EditFolderReducer>) -> EditFolderState {
    store.send(EditFolderAction::SaveTapped);
    store.wait_until(|s| !s.is_processing).await
}

#[tokio::test]
async fn test_add_creates_top_level_folder() {
    let app = app().await;
    let store = app.edit_folder(EditFolderMode::Add { parent_folder: None });

    store.send(EditFolderAction::TitleChanged("  Books ".to_string()));
    assert_eq!(store.state().title_limit(), "8 / 10");
    let state = save(&store).await;

    assert!(state.should_dismiss);
    let created = state.did_finish_addition.expect("folder should be created");
    assert_eq!(created.title, "Books");
    assert_eq!(created.depth, 0);
    assert_eq!(app.folders.fetch_folder(created.id).await.unwrap(), created);
}

#[tokio::test]
async fn test_add_under_parent_sets_depth() {
    let app = app().await;
    let books = Folder::new("Books", None);
    app.folders.insert_folder(&books).await.unwrap();

    let store = app.edit_folder(EditFolderMode::Add {
        parent_folder: Some(books.clone()),
    });
    store.send(EditFolderAction::TitleChanged("Fiction".to_string()));
    let created = save(&store).await.did_finish_addition.unwrap();

    assert_eq!(created.parent_folder_id, Some(books.id));
    assert_eq!(created.depth, 1);
}

#[tokio::test]
async fn test_blank_title_does_nothing() {
    let app = app().await;
    let store = app.edit_folder(EditFolderMode::Add { parent_folder: None });
    store.send(EditFolderAction::TitleChanged("   ".to_string()));
    store.send(EditFolderAction::SaveTapped);

    let state = store.state();
    assert!(!state.is_processing);
    assert!(!state.should_dismiss);
    assert!(app.folders.fetch_all_folders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_moves_folder_to_top_level() {
    let app = app().await;
    let books = Folder::new("Books", None);
    let fiction = Folder::new("Fiction", Some(&books));
    let classics = Folder::new("Classics", Some(&fiction));
    for folder in [&books, &fiction, &classics] {
        app.folders.insert_folder(folder).await.unwrap();
    }
    let fiction = app.folders.fetch_folder(fiction.id).await.unwrap();

    let store = app.edit_folder(EditFolderMode::Edit {
        parent_folder: Some(books.clone()),
        folder: fiction.clone(),
    });
    assert!(!store.state().is_savable());
    store.send(EditFolderAction::SelectParent(None));
    assert!(store.state().is_savable());

    let state = save(&store).await;
    assert!(state.should_dismiss);
    assert!(state.did_finish_addition.is_none());

    let moved = app.folders.fetch_folder(fiction.id).await.unwrap();
    assert_eq!(moved.parent_folder_id, None);
    assert_eq!(moved.depth, 0);
    assert_eq!(moved.created_at, fiction.created_at);
    assert_eq!(moved.folders[0].id, classics.id);
    assert_eq!(moved.folders[0].depth, 1);
}

#[tokio::test]
async fn test_failed_save_surfaces_alert() {
    // No parent row exists, so storage rejects the insert.
    let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
    let repo = Arc::new(FolderRepository::new(storage, None));
    let ghost_parent = Folder::new("Ghost", None);
    let store = Store::new(
        EditFolderReducer::new(repo),
        EditFolderState::new(EditFolderMode::Add {
            parent_folder: Some(ghost_parent),
        }),
    );

    store.send(EditFolderAction::TitleChanged("Orphan".to_string()));
    let state = save(&store).await;

    assert!(!state.should_dismiss);
    assert_eq!(
        state.alert_message.as_deref(),
        Some(DomainError::InsertFailed.to_string().as_str())
    );

    store.send(EditFolderAction::TitleChanged("Orphan 2".to_string()));
    assert!(store.state().alert_message.is_none());
}

#[tokio::test]
async fn test_selector_navigation_flag() {
    let app = app().await;
    let store = app.edit_folder(EditFolderMode::Add { parent_folder: None });
    store.send(EditFolderAction::FolderViewTapped);
    assert!(store.state().should_navigate_to_folder_selector);
    store.send(EditFolderAction::FolderSelectorDismissed);
    assert!(!store.state().should_navigate_to_folder_selector);
}
