use serde::{Deserialize, Serialize};

/// Application configuration read from `settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// SQLite database file. `None` uses the platform data directory.
    pub database_path: Option<String>,
    /// Default `tracing` filter when `RUST_LOG` is not set.
    pub log_level: String,
    /// Populate the folder cache from storage at startup.
    pub warm_cache_on_startup: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            log_level: "info".to_string(),
            warm_cache_on_startup: true,
        }
    }
}

/// Direction used by folder sort options.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// How folders are ordered in listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FolderSortOption {
    Title(SortDirection),
    CreatedAt(SortDirection),
    UpdatedAt(SortDirection),
}

impl Default for FolderSortOption {
    fn default() -> Self {
        FolderSortOption::Title(SortDirection::Ascending)
    }
}

/// How the save path breadcrumb is laid out on the clip editor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SavePathOption {
    #[default]
    Expand,
    Collapse,
}

impl SavePathOption {
    pub fn raw_value(self) -> i64 {
        match self {
            SavePathOption::Expand => 0,
            SavePathOption::Collapse => 1,
        }
    }

    pub fn from_raw_value(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(SavePathOption::Expand),
            1 => Some(SavePathOption::Collapse),
            _ => None,
        }
    }
}
