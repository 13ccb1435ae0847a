// Clipster shared type definitions
// Each submodule defines types used across the application.

pub mod clip;
pub mod errors;
pub mod folder;
pub mod settings;

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current UNIX timestamp in milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
