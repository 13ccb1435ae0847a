use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clip::Clip;
use super::now_millis;

/// A node of the user's folder hierarchy.
///
/// `folders` and `clips` hold the materialized subtree as read from the cache
/// or from storage. Tombstoned children are kept; listings filter them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Folder {
    pub id: Uuid,
    pub parent_folder_id: Option<Uuid>,
    pub title: String,
    pub depth: u32,
    pub folders: Vec<Folder>,
    pub clips: Vec<Clip>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

impl Folder {
    /// Creates a fresh folder under `parent` (or at the top level).
    pub fn new(title: &str, parent: Option<&Folder>) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4(),
            parent_folder_id: parent.map(|p| p.id),
            title: title.to_string(),
            depth: parent.map_or(0, |p| p.depth + 1),
            folders: Vec::new(),
            clips: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_folder_id.is_none()
    }

    /// Child folders without tombstones, in stored order.
    pub fn visible_folders(&self) -> impl Iterator<Item = &Folder> {
        self.folders.iter().filter(|f| !f.is_deleted())
    }

    /// Clips without tombstones, in stored order.
    pub fn visible_clips(&self) -> impl Iterator<Item = &Clip> {
        self.clips.iter().filter(|c| !c.is_deleted())
    }

    /// Returns a copy carrying a tombstone at `now`.
    pub fn tombstoned(&self, now: i64) -> Self {
        Self {
            updated_at: now,
            deleted_at: Some(now),
            ..self.clone()
        }
    }

    /// Returns a copy without its nested subtree.
    pub fn shallow(&self) -> Self {
        Self {
            folders: Vec::new(),
            clips: Vec::new(),
            ..self.clone()
        }
    }
}
