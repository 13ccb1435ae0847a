// Clipster state managers
// The folder tree, its cache, and the repositories that keep the cache in step with storage.

pub mod clip_repository;
pub mod folder_cache;
pub mod folder_repository;
pub mod folder_tree;
