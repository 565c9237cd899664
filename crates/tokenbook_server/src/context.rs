//! Application context.
//!
//! # Responsibility
//! - Own the loaded configuration and the constructed directory service.
//! - Be the single initialization point for shared server state.
//!
//! # Invariants
//! - Built once in `main` and handed (via `Arc`) to every route; the server
//!   keeps no ambient global state.

use crate::config::Config;
use tokenbook_core::{DirectoryService, JsonFileStore};

/// Shared state for route handlers.
pub struct AppContext {
    pub config: Config,
    pub directory: DirectoryService<JsonFileStore>,
}

impl AppContext {
    /// Builds the context from a loaded configuration.
    pub fn new(config: Config) -> Self {
        let store = JsonFileStore::new(&config.store_path);
        Self {
            config,
            directory: DirectoryService::new(store),
        }
    }
}
