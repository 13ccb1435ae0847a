//! SQLite implementation of [`FolderStorage`] and [`ClipStorage`].
//!
//! Queries run synchronously under a mutex around the connection; the async
//! signatures only exist to satisfy the storage contract.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use super::connection::Database;
use super::storage::{ClipStorage, FolderStorage};
use crate::managers::folder_tree::FolderTree;
use crate::types::clip::{Clip, UrlMetadata};
use crate::types::errors::StorageError;
use crate::types::folder::Folder;

const FOLDER_COLUMNS: &str =
    "id, parent_folder_id, title, depth, created_at, updated_at, deleted_at";

const CLIP_COLUMNS: &str = "id, folder_id, url, url_title, thumbnail_image_url, screenshot_data, \
     url_created_at, url_updated_at, url_deleted_at, memo, last_visited_at, \
     created_at, updated_at, deleted_at";

/// Folder and clip storage backed by a SQLite [`Database`].
pub struct SqliteStorage {
    db: Mutex<Database>,
}

fn uuid_at(row: &Row, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn optional_uuid_at(row: &Row, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        Uuid::parse_str(&s)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

impl SqliteStorage {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Opens the database file at `path`, running migrations first.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Ok(Self::new(Database::open(path)?))
    }

    /// Opens a fresh in-memory database. Mostly useful in tests.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let db = self.db.lock().map_err(|_| StorageError::LockPoisoned)?;
        f(db.connection())
    }

    /// Reads a single `Folder` row. The nested lists are left empty.
    fn row_to_folder(row: &Row) -> rusqlite::Result<Folder> {
        Ok(Folder {
            id: uuid_at(row, 0)?,
            parent_folder_id: optional_uuid_at(row, 1)?,
            title: row.get(2)?,
            depth: row.get(3)?,
            folders: Vec::new(),
            clips: Vec::new(),
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
            deleted_at: row.get(6)?,
        })
    }

    fn row_to_clip(row: &Row) -> rusqlite::Result<Clip> {
        Ok(Clip {
            id: uuid_at(row, 0)?,
            folder_id: uuid_at(row, 1)?,
            url_metadata: UrlMetadata {
                url: row.get(2)?,
                title: row.get(3)?,
                thumbnail_image_url: row.get(4)?,
                screenshot_data: row.get(5)?,
                created_at: row.get(6)?,
                updated_at: row.get(7)?,
                deleted_at: row.get(8)?,
            },
            memo: row.get(9)?,
            last_visited_at: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
            deleted_at: row.get(13)?,
        })
    }

    fn query_folders(
        conn: &Connection,
        sql: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Folder>, StorageError> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(args, Self::row_to_folder)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn query_clips(
        conn: &Connection,
        sql: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Clip>, StorageError> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(args, Self::row_to_clip)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// Loads every folder and clip into a tree.
    fn load_tree(conn: &Connection) -> Result<FolderTree, StorageError> {
        let folders = Self::query_folders(
            conn,
            &format!("SELECT {} FROM folders", FOLDER_COLUMNS),
            &[],
        )?;
        let clips = Self::query_clips(conn, &format!("SELECT {} FROM clips", CLIP_COLUMNS), &[])?;
        Ok(FolderTree::from_rows(folders, clips))
    }

    /// Loads the subtree rooted at `id`.
    fn load_subtree(conn: &Connection, id: &Uuid) -> Result<FolderTree, StorageError> {
        let subtree = "WITH RECURSIVE subtree(id) AS ( \
                 SELECT id FROM folders WHERE id = ?1 \
                 UNION ALL \
                 SELECT f.id FROM folders f JOIN subtree s ON f.parent_folder_id = s.id)";
        let id = id.to_string();
        let folders = Self::query_folders(
            conn,
            &format!(
                "{} SELECT {} FROM folders WHERE id IN (SELECT id FROM subtree)",
                subtree, FOLDER_COLUMNS
            ),
            &[&id],
        )?;
        let clips = Self::query_clips(
            conn,
            &format!(
                "{} SELECT {} FROM clips WHERE folder_id IN (SELECT id FROM subtree)",
                subtree, CLIP_COLUMNS
            ),
            &[&id],
        )?;
        Ok(FolderTree::from_rows(folders, clips))
    }

    /// Returns `(depth, deleted_at)` of a folder row, if it exists.
    fn folder_state(conn: &Connection, id: &Uuid) -> Result<Option<(u32, Option<i64>)>, StorageError> {
        let state = conn
            .query_row(
                "SELECT depth, deleted_at FROM folders WHERE id = ?1",
                params![id.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(state)
    }

    /// Checks whether `candidate` is `ancestor` or one of its descendants.
    fn is_self_or_descendant(
        conn: &Connection,
        candidate: &Uuid,
        ancestor: &Uuid,
    ) -> Result<bool, StorageError> {
        let count: i64 = conn.query_row(
            "WITH RECURSIVE subtree(id) AS ( \
                 SELECT id FROM folders WHERE id = ?1 \
                 UNION ALL \
                 SELECT f.id FROM folders f JOIN subtree s ON f.parent_folder_id = s.id) \
             SELECT COUNT(*) FROM subtree WHERE id = ?2",
            params![ancestor.to_string(), candidate.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Validates the parent of a folder about to be written and returns the
    /// depth the folder must have under it.
    fn expected_depth(
        conn: &Connection,
        folder: &Folder,
        parent_changed: bool,
    ) -> Result<u32, StorageError> {
        let Some(pid) = folder.parent_folder_id else {
            return Ok(0);
        };
        if pid == folder.id {
            return Err(StorageError::InvalidHierarchy(format!(
                "folder {} cannot be its own parent",
                folder.id
            )));
        }
        let (parent_depth, parent_deleted) = Self::folder_state(conn, &pid)?.ok_or_else(|| {
            StorageError::InvalidHierarchy(format!("parent folder {} does not exist", pid))
        })?;
        if parent_changed {
            if parent_deleted.is_some() {
                return Err(StorageError::InvalidHierarchy(format!(
                    "parent folder {} is deleted",
                    pid
                )));
            }
            if Self::is_self_or_descendant(conn, &pid, &folder.id)? {
                return Err(StorageError::InvalidHierarchy(format!(
                    "folder {} cannot move below its own descendant {}",
                    folder.id, pid
                )));
            }
        }
        Ok(parent_depth + 1)
    }

    fn check_depth(folder: &Folder, expected: u32) -> Result<(), StorageError> {
        if folder.depth != expected {
            return Err(StorageError::InvalidHierarchy(format!(
                "folder {} has depth {}, expected {}",
                folder.id, folder.depth, expected
            )));
        }
        Ok(())
    }

    /// Shared write path of update and delete.
    fn write_folder(conn: &Connection, folder: &Folder) -> Result<(), StorageError> {
        let current_parent: Option<Option<String>> = conn
            .query_row(
                "SELECT parent_folder_id FROM folders WHERE id = ?1",
                params![folder.id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let current_parent =
            current_parent.ok_or_else(|| StorageError::NotFound(folder.id.to_string()))?;
        let parent_changed = current_parent != folder.parent_folder_id.map(|p| p.to_string());

        let expected = Self::expected_depth(conn, folder, parent_changed)?;
        Self::check_depth(folder, expected)?;

        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE folders SET parent_folder_id = ?1, title = ?2, depth = ?3, created_at = ?4, \
             updated_at = ?5, deleted_at = ?6 WHERE id = ?7",
            params![
                folder.parent_folder_id.map(|p| p.to_string()),
                folder.title,
                folder.depth,
                folder.created_at,
                folder.updated_at,
                folder.deleted_at,
                folder.id.to_string(),
            ],
        )?;
        if parent_changed {
            // Re-derive the depth of the moved subtree.
            tx.execute(
                "WITH RECURSIVE subtree(id, depth) AS ( \
                     SELECT id, ?2 + 1 FROM folders WHERE parent_folder_id = ?1 \
                     UNION ALL \
                     SELECT f.id, s.depth + 1 FROM folders f JOIN subtree s ON f.parent_folder_id = s.id) \
                 UPDATE folders SET depth = (SELECT depth FROM subtree WHERE subtree.id = folders.id) \
                 WHERE id IN (SELECT id FROM subtree)",
                params![folder.id.to_string(), folder.depth],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn write_clip(conn: &Connection, clip: &Clip) -> Result<(), StorageError> {
        if Self::folder_state(conn, &clip.folder_id)?.is_none() {
            return Err(StorageError::InvalidHierarchy(format!(
                "folder {} does not exist",
                clip.folder_id
            )));
        }
        let meta = &clip.url_metadata;
        let affected = conn.execute(
            "UPDATE clips SET folder_id = ?1, url = ?2, url_title = ?3, thumbnail_image_url = ?4, \
             screenshot_data = ?5, url_created_at = ?6, url_updated_at = ?7, url_deleted_at = ?8, \
             memo = ?9, last_visited_at = ?10, created_at = ?11, updated_at = ?12, deleted_at = ?13 \
             WHERE id = ?14",
            params![
                clip.folder_id.to_string(),
                meta.url,
                meta.title,
                meta.thumbnail_image_url,
                meta.screenshot_data,
                meta.created_at,
                meta.updated_at,
                meta.deleted_at,
                clip.memo,
                clip.last_visited_at,
                clip.created_at,
                clip.updated_at,
                clip.deleted_at,
                clip.id.to_string(),
            ],
        )?;
        if affected == 0 {
            return Err(StorageError::NotFound(clip.id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl FolderStorage for SqliteStorage {
    async fn fetch_folder(&self, id: Uuid) -> Result<Folder, StorageError> {
        self.with_conn(|conn| {
            Self::load_subtree(conn, &id)?
                .folder(&id)
                .ok_or_else(|| StorageError::NotFound(id.to_string()))
        })
    }

    async fn fetch_all_folders(&self) -> Result<Vec<Folder>, StorageError> {
        self.with_conn(|conn| {
            let tree = Self::load_tree(conn)?;
            Ok(tree
                .all_folders()
                .into_iter()
                .filter(|f| !f.is_deleted())
                .collect())
        })
    }

    async fn fetch_top_level_folders(&self) -> Result<Vec<Folder>, StorageError> {
        self.with_conn(|conn| {
            let tree = Self::load_tree(conn)?;
            Ok(tree.roots().into_iter().filter(|f| !f.is_deleted()).collect())
        })
    }

    async fn fetch_forest(&self) -> Result<Vec<Folder>, StorageError> {
        self.with_conn(|conn| Ok(Self::load_tree(conn)?.roots()))
    }

    async fn insert_folder(&self, folder: &Folder) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            let expected = Self::expected_depth(conn, folder, true)?;
            Self::check_depth(folder, expected)?;
            conn.execute(
                &format!(
                    "INSERT INTO folders ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    FOLDER_COLUMNS
                ),
                params![
                    folder.id.to_string(),
                    folder.parent_folder_id.map(|p| p.to_string()),
                    folder.title,
                    folder.depth,
                    folder.created_at,
                    folder.updated_at,
                    folder.deleted_at,
                ],
            )?;
            debug!(folder_id = %folder.id, "inserted folder row");
            Ok(())
        })
    }

    async fn update_folder(&self, folder: &Folder) -> Result<(), StorageError> {
        self.with_conn(|conn| Self::write_folder(conn, folder))
    }

    async fn delete_folder(&self, folder: &Folder) -> Result<(), StorageError> {
        self.with_conn(|conn| Self::write_folder(conn, folder))
    }
}

#[async_trait]
impl ClipStorage for SqliteStorage {
    async fn fetch_clip(&self, id: Uuid) -> Result<Clip, StorageError> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM clips WHERE id = ?1", CLIP_COLUMNS),
                params![id.to_string()],
                Self::row_to_clip,
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
        })
    }

    async fn fetch_clips(&self, folder_id: Uuid) -> Result<Vec<Clip>, StorageError> {
        self.with_conn(|conn| {
            let folder_id = folder_id.to_string();
            Self::query_clips(
                conn,
                &format!(
                    "SELECT {} FROM clips WHERE folder_id = ?1 AND deleted_at IS NULL \
                     ORDER BY created_at, id",
                    CLIP_COLUMNS
                ),
                &[&folder_id],
            )
        })
    }

    async fn insert_clip(&self, clip: &Clip) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            if Self::folder_state(conn, &clip.folder_id)?.is_none() {
                return Err(StorageError::InvalidHierarchy(format!(
                    "folder {} does not exist",
                    clip.folder_id
                )));
            }
            let meta = &clip.url_metadata;
            conn.execute(
                &format!(
                    "INSERT INTO clips ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                    CLIP_COLUMNS
                ),
                params![
                    clip.id.to_string(),
                    clip.folder_id.to_string(),
                    meta.url,
                    meta.title,
                    meta.thumbnail_image_url,
                    meta.screenshot_data,
                    meta.created_at,
                    meta.updated_at,
                    meta.deleted_at,
                    clip.memo,
                    clip.last_visited_at,
                    clip.created_at,
                    clip.updated_at,
                    clip.deleted_at,
                ],
            )?;
            debug!(clip_id = %clip.id, "inserted clip row");
            Ok(())
        })
    }

    async fn update_clip(&self, clip: &Clip) -> Result<(), StorageError> {
        self.with_conn(|conn| Self::write_clip(conn, clip))
    }

    async fn delete_clip(&self, clip: &Clip) -> Result<(), StorageError> {
        self.with_conn(|conn| Self::write_clip(conn, clip))
    }
}
