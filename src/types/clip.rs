use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::now_millis;

/// Metadata captured for a saved URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UrlMetadata {
    pub url: String,
    pub title: String,
    pub thumbnail_image_url: Option<String>,
    pub screenshot_data: Option<Vec<u8>>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

impl UrlMetadata {
    pub fn new(url: &str, title: &str) -> Self {
        let now = now_millis();
        Self {
            url: url.to_string(),
            title: title.to_string(),
            thumbnail_image_url: None,
            screenshot_data: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// A saved link living inside a folder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clip {
    pub id: Uuid,
    pub folder_id: Uuid,
    pub url_metadata: UrlMetadata,
    pub memo: String,
    pub last_visited_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

impl Clip {
    pub fn new(folder_id: Uuid, url_metadata: UrlMetadata, memo: &str) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4(),
            folder_id,
            url_metadata,
            memo: memo.to_string(),
            last_visited_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns a copy recording a visit at `now`.
    pub fn visited(&self, now: i64) -> Self {
        Self {
            last_visited_at: Some(now),
            updated_at: now,
            ..self.clone()
        }
    }

    /// Returns a copy carrying a tombstone at `now`.
    pub fn tombstoned(&self, now: i64) -> Self {
        Self {
            updated_at: now,
            deleted_at: Some(now),
            ..self.clone()
        }
    }
}
