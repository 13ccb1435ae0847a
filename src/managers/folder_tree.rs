//! Arena-backed folder tree.
//!
//! Folders are stored flat, keyed by ID, with explicit parent IDs and ordered
//! child-ID lists. Nothing points at anything else; every traversal goes
//! through an ID lookup. Nested [`Folder`] values are only built on read.
//!
//! Children and clips are kept ordered by `(created_at, id)`, which is the
//! same order the SQLite storage reads them back in, so a tree built from
//! storage rows and a tree grown by upserts materialize identically.

use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use crate::types::clip::Clip;
use crate::types::folder::Folder;

type OrderKey = (i64, Uuid);

#[derive(Debug, Clone)]
struct Node {
    /// Folder scalars; `folders`/`clips` are always empty here.
    folder: Folder,
    children: Vec<OrderKey>,
    clips: Vec<Clip>,
}

/// Materialized folder hierarchy addressed by folder ID.
#[derive(Debug, Clone, Default)]
pub struct FolderTree {
    nodes: HashMap<Uuid, Node>,
    roots: Vec<OrderKey>,
    clip_owners: HashMap<Uuid, Uuid>,
}

fn order_key(folder: &Folder) -> OrderKey {
    (folder.created_at, folder.id)
}

fn insert_ordered(list: &mut Vec<OrderKey>, key: OrderKey) {
    let pos = list.binary_search(&key).unwrap_or_else(|p| p);
    list.insert(pos, key);
}

fn insert_clip_ordered(clips: &mut Vec<Clip>, clip: Clip) {
    let key = (clip.created_at, clip.id);
    let pos = clips
        .binary_search_by(|c| (c.created_at, c.id).cmp(&key))
        .unwrap_or_else(|p| p);
    clips.insert(pos, clip);
}

impl FolderTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from nested folders, e.g. a list of top-level folders
    /// carrying their subtrees.
    pub fn from_forest(forest: &[Folder]) -> Self {
        let mut folders = Vec::new();
        let mut clips = Vec::new();
        let mut stack: Vec<&Folder> = forest.iter().collect();
        while let Some(folder) = stack.pop() {
            folders.push(folder.shallow());
            clips.extend(folder.clips.iter().cloned());
            stack.extend(folder.folders.iter());
        }
        Self::from_rows(folders, clips)
    }

    /// Builds a tree from flat rows in any order.
    ///
    /// A folder whose parent is not among the rows becomes a root, which lets a
    /// single subtree be loaded on its own. Clips whose folder is missing are dropped.
    pub fn from_rows(folders: Vec<Folder>, clips: Vec<Clip>) -> Self {
        let mut tree = Self::new();
        for folder in folders {
            tree.nodes.insert(
                folder.id,
                Node {
                    folder: folder.shallow(),
                    children: Vec::new(),
                    clips: Vec::new(),
                },
            );
        }

        let links: Vec<(OrderKey, Option<Uuid>)> = tree
            .nodes
            .values()
            .map(|n| (order_key(&n.folder), n.folder.parent_folder_id))
            .collect();
        for (key, parent) in links {
            match parent.and_then(|pid| tree.nodes.get_mut(&pid)) {
                Some(parent) => parent.children.push(key),
                None => tree.roots.push(key),
            }
        }
        tree.roots.sort();
        for node in tree.nodes.values_mut() {
            node.children.sort();
        }

        for clip in clips {
            tree.attach_clip(clip);
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.nodes.contains_key(id)
    }

    /// Returns the folder with its whole subtree, wherever it sits in the tree.
    pub fn folder(&self, id: &Uuid) -> Option<Folder> {
        let node = self.nodes.get(id)?;
        let mut folder = node.folder.clone();
        folder.folders = node
            .children
            .iter()
            .filter_map(|(_, child)| self.folder(child))
            .collect();
        folder.clips = node.clips.clone();
        Some(folder)
    }

    /// Top-level folders with their subtrees, in order.
    pub fn roots(&self) -> Vec<Folder> {
        self.roots
            .iter()
            .filter_map(|(_, id)| self.folder(id))
            .collect()
    }

    /// Every folder in pre-order, each materialized with its subtree.
    pub fn all_folders(&self) -> Vec<Folder> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<Uuid> = self.roots.iter().rev().map(|(_, id)| *id).collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().rev().map(|(_, c)| *c));
            }
            if let Some(folder) = self.folder(&id) {
                out.push(folder);
            }
        }
        out
    }

    /// Returns true if `candidate` is `ancestor` itself or lies below it.
    pub fn is_self_or_descendant(&self, candidate: &Uuid, ancestor: &Uuid) -> bool {
        let mut current = Some(*candidate);
        let mut hops = 0;
        while let Some(id) = current {
            if id == *ancestor {
                return true;
            }
            hops += 1;
            if hops > self.nodes.len() {
                return false;
            }
            current = self.nodes.get(&id).and_then(|n| n.folder.parent_folder_id);
        }
        false
    }

    /// Inserts or replaces a folder's own fields.
    ///
    /// The nested `folders`/`clips` carried by `folder` are ignored; the tree
    /// keeps its own children. A changed parent moves the folder (and its
    /// subtree) and re-derives the depth of every descendant.
    pub fn upsert_folder(&mut self, folder: &Folder) {
        let shallow = folder.shallow();
        let key = order_key(&shallow);

        if let Some(pid) = shallow.parent_folder_id {
            if pid == shallow.id || self.is_self_or_descendant(&pid, &shallow.id) {
                warn!(folder_id = %shallow.id, parent_id = %pid, "refusing to move folder below itself");
                return;
            }
        }

        if let Some(existing) = self.nodes.get(&shallow.id) {
            let old_key = order_key(&existing.folder);
            let old_parent = existing.folder.parent_folder_id;
            self.unlink(old_key, old_parent);
        }

        let node = self.nodes.entry(shallow.id).or_insert_with(|| Node {
            folder: shallow.clone(),
            children: Vec::new(),
            clips: Vec::new(),
        });
        node.folder = shallow.clone();

        self.link(key, shallow.parent_folder_id);
        self.refresh_descendant_depths(&shallow.id);
    }

    /// Looks up a clip anywhere in the tree.
    pub fn clip(&self, id: &Uuid) -> Option<Clip> {
        let owner = self.clip_owners.get(id)?;
        self.nodes
            .get(owner)?
            .clips
            .iter()
            .find(|c| c.id == *id)
            .cloned()
    }

    /// Inserts or replaces a clip, moving it if its folder changed.
    ///
    /// Returns false if the clip's folder is not in the tree.
    pub fn upsert_clip(&mut self, clip: &Clip) -> bool {
        if !self.nodes.contains_key(&clip.folder_id) {
            warn!(clip_id = %clip.id, folder_id = %clip.folder_id, "clip folder missing from tree");
            return false;
        }
        if let Some(owner) = self.clip_owners.remove(&clip.id) {
            if let Some(node) = self.nodes.get_mut(&owner) {
                node.clips.retain(|c| c.id != clip.id);
            }
        }
        self.attach_clip(clip.clone())
    }

    fn attach_clip(&mut self, clip: Clip) -> bool {
        match self.nodes.get_mut(&clip.folder_id) {
            Some(node) => {
                self.clip_owners.insert(clip.id, clip.folder_id);
                insert_clip_ordered(&mut node.clips, clip);
                true
            }
            None => false,
        }
    }

    fn unlink(&mut self, key: OrderKey, parent: Option<Uuid>) {
        let list = match parent.and_then(|pid| self.nodes.get_mut(&pid)) {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        };
        list.retain(|k| *k != key);
    }

    fn link(&mut self, key: OrderKey, parent: Option<Uuid>) {
        match parent.and_then(|pid| self.nodes.get_mut(&pid)) {
            Some(parent) => insert_ordered(&mut parent.children, key),
            None => {
                if let Some(pid) = parent {
                    warn!(folder_id = %key.1, parent_id = %pid, "parent missing from tree, keeping folder at top level");
                }
                insert_ordered(&mut self.roots, key);
            }
        }
    }

    fn refresh_descendant_depths(&mut self, id: &Uuid) {
        let mut stack = vec![*id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            let child_depth = node.folder.depth + 1;
            let children: Vec<Uuid> = node.children.iter().map(|(_, c)| *c).collect();
            for child in children {
                if let Some(child_node) = self.nodes.get_mut(&child) {
                    child_node.folder.depth = child_depth;
                    stack.push(child);
                }
            }
        }
    }
}
