//! Cache population from storage.

use tracing::{info, warn};

use crate::database::storage::FolderStorage;
use crate::managers::folder_cache::FolderCache;
use crate::types::errors::StorageError;

/// Loads the whole folder forest (tombstones included) from storage and swaps
/// it into the cache. On failure the cache is left exactly as it was.
///
/// The load runs under the cache's write lock, so repository writes wait for
/// it instead of committing unseen in between.
///
/// Returns the number of top-level folders loaded.
pub async fn warm_cache(storage: &dyn FolderStorage, cache: &FolderCache) -> Result<usize, StorageError> {
    let roots = cache
        .populate_from(storage.fetch_forest())
        .await
        .map_err(|e| {
            warn!(error = %e, "cache warm-up failed, keeping storage reads");
            e
        })?;
    info!(roots, "cache warm-up complete");
    Ok(roots)
}
