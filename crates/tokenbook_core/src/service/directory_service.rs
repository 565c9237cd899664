//! Directory use-case service.
//!
//! # Responsibility
//! - Provide stable list/add/delete entry points for surface callers.
//! - Delegate persistence to store implementations.
//!
//! # Invariants
//! - Service APIs never bypass store validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::contact::{Contact, ContactId};
use crate::store::contact_store::{DirectoryStore, StoreResult};
use log::warn;

/// Use-case wrapper over a directory store.
pub struct DirectoryService<S: DirectoryStore> {
    store: S,
}

impl<S: DirectoryStore> DirectoryService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the full directory in insertion order.
    pub fn list(&self) -> StoreResult<Vec<Contact>> {
        self.store.list()
    }

    /// Returns the directory with entries matching `address` filtered out.
    ///
    /// Callers pass their own account address so the directory never offers
    /// the caller as a send target. Comparison is case-insensitive.
    pub fn list_excluding(&self, address: &str) -> StoreResult<Vec<Contact>> {
        let mut contacts = self.store.list()?;
        contacts.retain(|contact| !contact.matches_address(address));
        Ok(contacts)
    }

    /// Validates presence of both fields and appends a new contact.
    ///
    /// # Contract
    /// - Blank `email` or `address` is rejected before any storage access.
    /// - Email format is advisory: a suspect shape is logged, never rejected.
    /// - Returns the created stable contact ID.
    pub fn add_contact(
        &self,
        email: impl Into<String>,
        address: impl Into<String>,
    ) -> StoreResult<ContactId> {
        let contact = Contact::new(email, address);
        if !contact.email_looks_valid() {
            warn!(
                "event=contact_email_shape module=service status=advisory id={}",
                contact.id
            );
        }
        self.store.append(&contact)
    }

    /// Removes the entry at the given zero-based position.
    pub fn delete_at(&self, index: usize) -> StoreResult<Contact> {
        self.store.delete_at(index)
    }

    /// Removes the entry with the given stable id.
    ///
    /// Preferred over positional deletion when the caller holds ids: it
    /// cannot race against concurrent mutations shifting positions.
    pub fn delete_by_id(&self, id: ContactId) -> StoreResult<Contact> {
        self.store.delete_by_id(id)
    }
}
