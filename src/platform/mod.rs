// Clipster platform abstraction
// Resolves where settings and the database live on Windows, macOS, and Linux.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Returns the platform-specific configuration directory for Clipster.
///
/// - **Linux**: `~/.config/clipster` (or `$XDG_CONFIG_HOME/clipster`)
/// - **macOS**: `~/Library/Application Support/Clipster`
/// - **Windows**: `%APPDATA%/Clipster`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the platform-specific data directory for Clipster.
///
/// - **Linux**: `~/.local/share/clipster` (or `$XDG_DATA_HOME/clipster`)
/// - **macOS**: `~/Library/Application Support/Clipster`
/// - **Windows**: `%APPDATA%/Clipster`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}
