//! Core domain logic for the tokenbook contact directory.
//! This crate is the single source of truth for business invariants.

pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactId, ContactValidationError};
pub use service::directory_service::DirectoryService;
pub use store::contact_store::{DirectoryStore, JsonFileStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
