//! Unit tests for the preference stores and app configuration loading.

use clipster::services::app_config::{database_path, load_settings};
use clipster::services::settings_store::*;
use clipster::types::settings::{AppSettings, FolderSortOption, SavePathOption, SortDirection};
use serde_json::Value;
use tempfile::TempDir;

fn store_in_temp(dir: &TempDir) -> JsonSettingsStore {
    JsonSettingsStore::open(Some(dir.path().join("preferences.json"))).unwrap()
}

#[test]
fn test_defaults_when_nothing_saved() {
    let store = MemorySettingsStore::new();
    assert_eq!(
        fetch_folder_sort_option(&store),
        FolderSortOption::Title(SortDirection::Ascending)
    );
    assert_eq!(fetch_save_path_option(&store), SavePathOption::Expand);
}

#[test]
fn test_json_store_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = store_in_temp(&dir);
        save_folder_sort_option(&mut store, FolderSortOption::UpdatedAt(SortDirection::Descending))
            .unwrap();
        save_save_path_option(&mut store, SavePathOption::Collapse).unwrap();
    }

    let store = store_in_temp(&dir);
    assert_eq!(
        fetch_folder_sort_option(&store),
        FolderSortOption::UpdatedAt(SortDirection::Descending)
    );
    assert_eq!(fetch_save_path_option(&store), SavePathOption::Collapse);
}

#[test]
fn test_remove_restores_default() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in_temp(&dir);
    save_save_path_option(&mut store, SavePathOption::Collapse).unwrap();
    store.remove(SAVE_PATH_OPTION_KEY).unwrap();

    let reopened = store_in_temp(&dir);
    assert_eq!(fetch_save_path_option(&reopened), SavePathOption::Expand);
}

#[test]
fn test_garbage_sort_value_falls_back() {
    let mut store = MemorySettingsStore::new();
    store
        .set(FOLDER_SORT_OPTION_KEY, Value::String("size|sideways".to_string()))
        .unwrap();
    assert_eq!(fetch_folder_sort_option(&store), FolderSortOption::default());
}

#[test]
fn test_non_object_preferences_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("preferences.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();
    assert!(JsonSettingsStore::open(Some(path)).is_err());
}

#[test]
fn test_settings_file_overrides_database_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"database_path": "/tmp/other.db", "log_level": "debug"}"#).unwrap();

    let settings = load_settings(&path).unwrap();
    assert_eq!(settings.log_level, "debug");
    assert!(settings.warm_cache_on_startup);
    assert_eq!(database_path(&settings), std::path::PathBuf::from("/tmp/other.db"));
    assert_ne!(settings, AppSettings::default());
}
