//! Tokenbook directory server library.
//!
//! Provides the HTTP surface over `tokenbook_core`: configuration loading,
//! the application context handed to every route, and the warp route tree.

pub mod api;
pub mod config;
pub mod context;
