//! Clipster: a personal link manager that keeps saved clips in a folder tree.
//!
//! Entry point: runs a console demo of the folder and clip screens against an
//! in-memory database, or the configured database file when `--persist` is given.

use std::error::Error;

use clipster::app::App;
use clipster::managers::clip_repository::ClipRepositoryTrait;
use clipster::screens::edit_folder::{EditFolderAction, EditFolderMode};
use clipster::screens::folder_selector::{FolderSelectorAction, FolderSelectorMode};
use clipster::screens::folder_view::FolderViewAction;
use clipster::services::app_config;
use clipster::services::path_resolver::resolve_path;
use clipster::types::clip::{Clip, UrlMetadata};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let settings = app_config::load_settings(&app_config::default_settings_path())?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!();
    println!("  Clipster v{} (demo mode)", env!("CARGO_PKG_VERSION"));
    println!();

    let persist = std::env::args().any(|a| a == "--persist");
    let app = if persist {
        App::new(settings)?
    } else {
        App::in_memory(settings)?
    };
    app.startup().await;

    section("Edit Folder");
    let books = {
        let store = app.edit_folder(EditFolderMode::Add { parent_folder: None });
        store.send(EditFolderAction::TitleChanged("Books".to_string()));
        println!("  Title limit: {}", store.state().title_limit());
        store.send(EditFolderAction::SaveTapped);
        let state = store.wait_until(|s| !s.is_processing).await;
        state.did_finish_addition.ok_or("folder was not created")?
    };
    let fiction = {
        let store = app.edit_folder(EditFolderMode::Add {
            parent_folder: Some(books.clone()),
        });
        store.send(EditFolderAction::TitleChanged("Fiction".to_string()));
        store.send(EditFolderAction::SaveTapped);
        let state = store.wait_until(|s| !s.is_processing).await;
        state.did_finish_addition.ok_or("folder was not created")?
    };
    println!("  Created '{}' and '{}' (depth {})", books.title, fiction.title, fiction.depth);
    println!();

    section("Folder Selector");
    let selector = app.folder_selector(FolderSelectorMode::EditClip {
        parent_folder: Some(fiction.clone()),
    });
    selector.send(FolderSelectorAction::Load);
    let state = selector.wait_until(|s| !s.is_loading).await;
    let breadcrumb: Vec<&str> = state.current_path.iter().map(|f| f.title.as_str()).collect();
    println!("  Breadcrumb: {}", breadcrumb.join(" / "));
    println!("  Selectable: {}", state.is_selectable());
    if let Some(path) = resolve_path(&state.folders, &fiction.id) {
        println!("  Resolved path length: {}", path.len());
    }
    println!();

    section("Folder View");
    let clip = Clip::new(
        fiction.id,
        UrlMetadata::new("https://www.rust-lang.org", "Rust"),
        "read later",
    );
    app.clips.insert_clip(&clip).await?;
    let view = app.folder_view(fiction.clone());
    view.send(FolderViewAction::Reload);
    let state = view.wait_until(|s| !s.is_loading).await;
    println!("  '{}' holds {} clip(s)", state.title(), state.clips().len());

    view.send(FolderViewAction::DeleteClip(clip.id));
    let state = view.wait_until(|s| s.is_empty()).await;
    println!("  After delete, empty: {}", state.is_empty());
    println!();

    Ok(())
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────────────────────");
}
