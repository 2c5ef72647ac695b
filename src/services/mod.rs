//! Outbound collaborators module
//!
//! This module contains the planner API client and its credential source.

pub mod credentials;
pub mod session_store;

// Re-export main types
pub use credentials::{StaticToken, TokenProvider};
pub use session_store::{HttpSessionStore, SessionStore, DEFAULT_API_URL};
