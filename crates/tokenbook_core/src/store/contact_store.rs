//! Directory store contract and JSON-file implementation.
//!
//! # Responsibility
//! - Provide list/append/delete over the persisted directory document.
//! - Keep every mutation a whole-document read-modify-write.
//!
//! # Invariants
//! - An absent document is an empty directory, never an error.
//! - Mutations are serialized behind one exclusive lock per store instance;
//!   at most one read-modify-write is in flight.
//! - The document on disk is always a complete JSON array: rewrites publish
//!   via temp-file-and-rename, never in place.

use crate::model::contact::{Contact, ContactId, ContactValidationError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage error for directory persistence operations.
#[derive(Debug)]
pub enum StoreError {
    /// Blank field rejected before any document access.
    Validation(ContactValidationError),
    /// Underlying filesystem failure (permissions, disk, rename).
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Document exists but is not a JSON array of contacts. Not auto-repaired.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Positional delete outside the current sequence.
    OutOfRange { index: usize, len: usize },
    /// Id-based delete naming no current entry.
    NotFound(ContactId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Io { path, source } => {
                write!(f, "directory storage failure at `{}`: {source}", path.display())
            }
            Self::Malformed { path, source } => write!(
                f,
                "directory document at `{}` is not a valid contact list: {source}",
                path.display()
            ),
            Self::OutOfRange { index, len } => {
                write!(f, "contact index {index} out of range for {len} entries")
            }
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            Self::OutOfRange { .. } => None,
            Self::NotFound(_) => None,
        }
    }
}

impl From<ContactValidationError> for StoreError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Storage contract for the contact directory.
///
/// Contacts are immutable once created; there is no update operation.
/// Changing an entry is delete plus re-add.
pub trait DirectoryStore {
    /// Returns the full ordered sequence. Absent document yields `vec![]`.
    fn list(&self) -> StoreResult<Vec<Contact>>;
    /// Appends one contact and returns its stable id. Creates the backing
    /// document on first use.
    fn append(&self, contact: &Contact) -> StoreResult<ContactId>;
    /// Removes and returns the entry at `index`; later entries shift down.
    fn delete_at(&self, index: usize) -> StoreResult<Contact>;
    /// Removes and returns the entry with the given stable id.
    fn delete_by_id(&self, id: ContactId) -> StoreResult<Contact>;
}

/// Directory store backed by a single JSON array document.
///
/// There is no in-memory cache: every operation re-reads durable storage,
/// so external edits to the file are picked up on the next call.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store over the given document path.
    ///
    /// The file and its parent directory are created lazily by the first
    /// successful append, matching a fresh installation starting empty.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the backing document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> StoreResult<Vec<Contact>> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: err,
                })
            }
        };

        serde_json::from_slice(&raw).map_err(|err| StoreError::Malformed {
            path: self.path.clone(),
            source: err,
        })
    }

    fn write_document(&self, contacts: &[Contact]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| StoreError::Io {
                    path: parent.to_path_buf(),
                    source: err,
                })?;
            }
        }

        let payload = serde_json::to_vec_pretty(contacts).map_err(|err| StoreError::Io {
            path: self.path.clone(),
            source: std::io::Error::other(err),
        })?;

        // Publish via rename so readers see either the old or the new
        // complete document. The random suffix keeps concurrent processes
        // from clobbering each other's staging file.
        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

        std::fs::write(&temp_path, payload).map_err(|err| StoreError::Io {
            path: temp_path.clone(),
            source: err,
        })?;

        std::fs::rename(&temp_path, &self.path).map_err(|err| {
            let _ = std::fs::remove_file(&temp_path);
            StoreError::Io {
                path: self.path.clone(),
                source: err,
            }
        })
    }

    fn lock_mutations(&self) -> std::sync::MutexGuard<'_, ()> {
        // A poisoned lock means an earlier writer panicked; the document
        // itself cannot be torn (rename is the only publish step), so the
        // lock is safe to reuse.
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DirectoryStore for JsonFileStore {
    fn list(&self) -> StoreResult<Vec<Contact>> {
        let started_at = Instant::now();
        match self.read_document() {
            Ok(contacts) => {
                info!(
                    "event=store_list module=store status=ok count={} duration_ms={}",
                    contacts.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(contacts)
            }
            Err(err) => {
                error!(
                    "event=store_list module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn append(&self, contact: &Contact) -> StoreResult<ContactId> {
        contact.validate()?;

        let started_at = Instant::now();
        let _guard = self.lock_mutations();

        let result = self.read_document().and_then(|mut contacts| {
            contacts.push(contact.clone());
            self.write_document(&contacts)?;
            Ok(contacts.len())
        });

        match result {
            Ok(count) => {
                info!(
                    "event=store_append module=store status=ok id={} count={} duration_ms={}",
                    contact.id,
                    count,
                    started_at.elapsed().as_millis()
                );
                Ok(contact.id)
            }
            Err(err) => {
                error!(
                    "event=store_append module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn delete_at(&self, index: usize) -> StoreResult<Contact> {
        let started_at = Instant::now();
        let _guard = self.lock_mutations();

        let result = self.read_document().and_then(|mut contacts| {
            if index >= contacts.len() {
                return Err(StoreError::OutOfRange {
                    index,
                    len: contacts.len(),
                });
            }
            let removed = contacts.remove(index);
            self.write_document(&contacts)?;
            Ok(removed)
        });

        match &result {
            Ok(removed) => info!(
                "event=store_delete module=store status=ok mode=index index={} id={} duration_ms={}",
                index,
                removed.id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_delete module=store status=error mode=index index={} duration_ms={} error={}",
                index,
                started_at.elapsed().as_millis(),
                err
            ),
        }

        result
    }

    fn delete_by_id(&self, id: ContactId) -> StoreResult<Contact> {
        let started_at = Instant::now();
        let _guard = self.lock_mutations();

        let result = self.read_document().and_then(|mut contacts| {
            let position = contacts
                .iter()
                .position(|contact| contact.id == id)
                .ok_or(StoreError::NotFound(id))?;
            let removed = contacts.remove(position);
            self.write_document(&contacts)?;
            Ok(removed)
        });

        match &result {
            Ok(_) => info!(
                "event=store_delete module=store status=ok mode=id id={} duration_ms={}",
                id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_delete module=store status=error mode=id id={} duration_ms={} error={}",
                id,
                started_at.elapsed().as_millis(),
                err
            ),
        }

        result
    }
}
