//! Breadcrumb path resolution over a folder forest.

use uuid::Uuid;

use crate::types::folder::Folder;

/// Returns the chain of folders from a top-level folder down to `target`,
/// inclusive, or `None` if `target` is not in `forest`.
///
/// Depth-first, roots and children visited in list order.
pub fn resolve_path<'a>(forest: &'a [Folder], target: &Uuid) -> Option<Vec<&'a Folder>> {
    for folder in forest {
        if folder.id == *target {
            return Some(vec![folder]);
        }
        if let Some(mut sub) = resolve_path(&folder.folders, target) {
            sub.insert(0, folder);
            return Some(sub);
        }
    }
    None
}

/// Owned variant of [`resolve_path`].
pub fn resolve_path_owned(forest: &[Folder], target: &Uuid) -> Option<Vec<Folder>> {
    resolve_path(forest, target).map(|path| path.into_iter().cloned().collect())
}

/// Checks the parent links and depth steps between adjacent entries.
pub fn is_well_formed<F: std::borrow::Borrow<Folder>>(path: &[F]) -> bool {
    path.windows(2).all(|pair| {
        let (parent, child) = (pair[0].borrow(), pair[1].borrow());
        child.parent_folder_id == Some(parent.id) && child.depth == parent.depth + 1
    })
}
