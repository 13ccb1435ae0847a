// Clipster services
// Stateless helpers around the core: path resolution, cache warm-up, configuration and preferences.

pub mod app_config;
pub mod cache_warmer;
pub mod path_resolver;
pub mod settings_store;
