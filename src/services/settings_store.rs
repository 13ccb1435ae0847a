// Clipster Settings Store
// Key-value preferences (folder sort order, save path layout) behind an injectable interface.
// The file-backed store keeps a flat JSON object at the platform-specific config path.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::{FolderSortOption, SavePathOption, SortDirection};

pub const FOLDER_SORT_OPTION_KEY: &str = "folderSortOption";
pub const SAVE_PATH_OPTION_KEY: &str = "savePathOption";

/// Trait defining the key-value settings interface.
pub trait SettingsStoreTrait: Send {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn remove(&mut self, key: &str) -> Result<(), SettingsError>;
}

/// Settings kept only in memory.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Map<String, Value>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn validate_key(key: &str) -> Result<(), SettingsError> {
    if key.trim().is_empty() {
        return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
    }
    Ok(())
}

impl SettingsStoreTrait for MemorySettingsStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        validate_key(key)?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SettingsError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Settings persisted as a JSON object on disk. Every change is saved immediately.
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonSettingsStore {
    /// Opens the store at `path_override`, or `preferences.json` in the
    /// platform config directory. A missing file starts empty.
    pub fn open(path_override: Option<PathBuf>) -> Result<Self, SettingsError> {
        let path = path_override.unwrap_or_else(|| platform::get_config_dir().join("preferences.json"));

        let values = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                SettingsError::IoError(format!("Failed to read preferences file: {}", e))
            })?;
            match serde_json::from_str::<Value>(&content).map_err(|e| {
                SettingsError::SerializationError(format!("Failed to parse preferences file: {}", e))
            })? {
                Value::Object(map) => map,
                _ => {
                    return Err(SettingsError::SerializationError(
                        "Preferences file must contain a JSON object".to_string(),
                    ))
                }
            }
        } else {
            Map::new()
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }
        let json = serde_json::to_string_pretty(&self.values).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize preferences: {}", e))
        })?;
        fs::write(&self.path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write preferences file: {}", e)))?;
        debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}

impl SettingsStoreTrait for JsonSettingsStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        validate_key(key)?;
        self.values.insert(key.to_string(), value);
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<(), SettingsError> {
        if self.values.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

fn direction_to_raw(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "ascending",
        SortDirection::Descending => "descending",
    }
}

fn direction_from_raw(raw: &str) -> Option<SortDirection> {
    match raw {
        "ascending" => Some(SortDirection::Ascending),
        "descending" => Some(SortDirection::Descending),
        _ => None,
    }
}

/// Encodes a sort option as `"<field>|<direction>"`, e.g. `"title|ascending"`.
pub fn encode_folder_sort_option(option: FolderSortOption) -> String {
    let (field, direction) = match option {
        FolderSortOption::Title(d) => ("title", d),
        FolderSortOption::CreatedAt(d) => ("createdAt", d),
        FolderSortOption::UpdatedAt(d) => ("updatedAt", d),
    };
    format!("{}|{}", field, direction_to_raw(direction))
}

pub fn decode_folder_sort_option(raw: &str) -> Option<FolderSortOption> {
    let (field, direction) = raw.split_once('|')?;
    let direction = direction_from_raw(direction)?;
    match field {
        "title" => Some(FolderSortOption::Title(direction)),
        "createdAt" => Some(FolderSortOption::CreatedAt(direction)),
        "updatedAt" => Some(FolderSortOption::UpdatedAt(direction)),
        _ => None,
    }
}

/// Reads the folder sort option, falling back to the default on absent or unknown values.
pub fn fetch_folder_sort_option(store: &dyn SettingsStoreTrait) -> FolderSortOption {
    store
        .get(FOLDER_SORT_OPTION_KEY)
        .and_then(|v| v.as_str().and_then(decode_folder_sort_option))
        .unwrap_or_default()
}

pub fn save_folder_sort_option(
    store: &mut dyn SettingsStoreTrait,
    option: FolderSortOption,
) -> Result<(), SettingsError> {
    store.set(
        FOLDER_SORT_OPTION_KEY,
        Value::String(encode_folder_sort_option(option)),
    )
}

/// Reads the save path layout; absent or unknown raw values mean `Expand`.
pub fn fetch_save_path_option(store: &dyn SettingsStoreTrait) -> SavePathOption {
    store
        .get(SAVE_PATH_OPTION_KEY)
        .and_then(|v| v.as_i64())
        .and_then(SavePathOption::from_raw_value)
        .unwrap_or_default()
}

pub fn save_save_path_option(
    store: &mut dyn SettingsStoreTrait,
    option: SavePathOption,
) -> Result<(), SettingsError> {
    store.set(SAVE_PATH_OPTION_KEY, Value::from(option.raw_value()))
}
