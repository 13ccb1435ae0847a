// Clipster platform paths for Linux
// Config: ~/.config/clipster
// Data:   ~/.local/share/clipster

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Uses `$XDG_CONFIG_HOME/clipster` if set, otherwise `~/.config/clipster`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("clipster"),
        _ => home_dir().join(".config").join("clipster"),
    }
}

/// Uses `$XDG_DATA_HOME/clipster` if set, otherwise `~/.local/share/clipster`.
pub fn get_data_dir() -> PathBuf {
    match env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("clipster"),
        _ => home_dir().join(".local").join("share").join("clipster"),
    }
}
