//! Durable storage for the contact directory.
//!
//! # Responsibility
//! - Define the storage contract used by the service layer.
//! - Keep file-format and locking details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Contact::validate()` before touching the document.
//! - Read paths must reject malformed persisted state instead of masking it.

pub mod contact_store;
