//! Persistence collaborators for the store.
//!
//! # Responsibility
//! - Define the key-value blob contract the store depends on.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - Loading never fails: absent or malformed values fall back to defaults.
//! - Write failures are returned to the caller, never swallowed here.

pub mod blob_repo;
