//! Domain model for the contact directory.
//!
//! # Responsibility
//! - Define the canonical contact record shared by store and surface layers.
//! - Keep validation semantics in one place.
//!
//! # Invariants
//! - Every contact is identified by a stable `ContactId`.
//! - Email format checks are advisory; presence checks are binding.

pub mod contact;
