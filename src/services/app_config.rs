// Clipster application configuration
// Loads `AppSettings` from `settings.json` at the platform-specific config path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::AppSettings;

/// Default location of the settings file.
pub fn default_settings_path() -> PathBuf {
    platform::get_config_dir().join("settings.json")
}

/// Default location of the SQLite database.
pub fn default_database_path() -> PathBuf {
    platform::get_data_dir().join("clipster.db")
}

/// Loads settings from `path`.
///
/// If the file does not exist, returns default settings.
/// If the file exists but is malformed, returns a serialization error.
pub fn load_settings(path: &Path) -> Result<AppSettings, SettingsError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

    serde_json::from_str(&content).map_err(|e| {
        SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
    })
}

/// Resolves the database path from settings, falling back to the data directory.
pub fn database_path(settings: &AppSettings) -> PathBuf {
    settings
        .database_path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(default_database_path)
}
