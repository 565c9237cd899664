//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep HTTP/CLI surfaces decoupled from storage details.

pub mod directory_service;
