//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical (email, chain-address) record and its identity.
//! - Provide presence validation for write paths and an advisory
//!   email-shape check for diagnostics.
//!
//! # Invariants
//! - `id` is stable and never reused for another contact.
//! - Presence validation rejects blank fields; it never inspects format.
//! - The persisted wire name of `address` is `cryptoAddress`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a directory entry.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ContactId = Uuid;

static EMAIL_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email shape regex"));

/// Validation error for contact presence checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactValidationError {
    /// `email` is empty or whitespace-only.
    EmptyEmail,
    /// `address` is empty or whitespace-only.
    EmptyAddress,
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "contact email must not be empty"),
            Self::EmptyAddress => write!(f, "contact crypto address must not be empty"),
        }
    }
}

impl Error for ContactValidationError {}

/// Canonical directory entry: one saved recipient.
///
/// Entries written by older installations carry only `email` and
/// `cryptoAddress`; a missing `id` is backfilled with a fresh UUID at parse
/// time so those documents stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Stable global ID used for race-free deletion and log correlation.
    #[serde(default = "Uuid::new_v4")]
    pub id: ContactId,
    /// Recipient email. Persisted as given, even when malformed.
    pub email: String,
    /// Recipient chain address. No canonicalization is applied.
    #[serde(rename = "cryptoAddress")]
    pub address: String,
}

impl Contact {
    /// Creates a contact with a generated stable ID.
    pub fn new(email: impl Into<String>, address: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), email, address)
    }

    /// Creates a contact with a caller-provided stable ID.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(
        id: ContactId,
        email: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            address: address.into(),
        }
    }

    /// Checks that both fields are present (non-blank).
    ///
    /// This is the only binding validation; format problems are left to
    /// [`Contact::email_looks_valid`] and the caller's judgement.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.email.trim().is_empty() {
            return Err(ContactValidationError::EmptyEmail);
        }
        if self.address.trim().is_empty() {
            return Err(ContactValidationError::EmptyAddress);
        }
        Ok(())
    }

    /// Advisory email-shape check: `local@domain.tld` with no whitespace.
    ///
    /// A `false` result never blocks persistence.
    pub fn email_looks_valid(&self) -> bool {
        EMAIL_SHAPE_RE.is_match(&self.email)
    }

    /// Case-insensitive address comparison for caller-side filtering.
    pub fn matches_address(&self, other: &str) -> bool {
        self.address.eq_ignore_ascii_case(other)
    }
}

#[cfg(test)]
mod tests {
    use super::{Contact, ContactValidationError};

    #[test]
    fn validate_accepts_plain_contact() {
        let contact = Contact::new("bob@example.com", "0xB0B");
        assert!(contact.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_fields() {
        let no_email = Contact::new("   ", "0xB0B");
        assert_eq!(
            no_email.validate(),
            Err(ContactValidationError::EmptyEmail)
        );

        let no_address = Contact::new("bob@example.com", "");
        assert_eq!(
            no_address.validate(),
            Err(ContactValidationError::EmptyAddress)
        );
    }

    #[test]
    fn email_shape_check_is_advisory_only() {
        let odd = Contact::new("not-an-email", "0xB0B");
        assert!(!odd.email_looks_valid());
        // Still persistable: presence validation passes.
        assert!(odd.validate().is_ok());

        let fine = Contact::new("a@x.com", "0xAAA");
        assert!(fine.email_looks_valid());
    }

    #[test]
    fn address_match_ignores_case() {
        let contact = Contact::new("bob@example.com", "0xAbCd");
        assert!(contact.matches_address("0XABCD"));
        assert!(!contact.matches_address("0xabce"));
    }

    #[test]
    fn wire_format_uses_crypto_address_field() {
        let contact = Contact::new("bob@example.com", "0xB0B");
        let json = serde_json::to_value(&contact).expect("contact serializes");
        assert!(json.get("cryptoAddress").is_some());
        assert!(json.get("address").is_none());
    }

    #[test]
    fn legacy_entry_without_id_gets_one_backfilled() {
        let legacy = r#"{"email":"bob@example.com","cryptoAddress":"0xB0B"}"#;
        let contact: Contact = serde_json::from_str(legacy).expect("legacy entry parses");
        assert_eq!(contact.email, "bob@example.com");
        assert_eq!(contact.address, "0xB0B");
        assert!(!contact.id.is_nil());
    }
}
