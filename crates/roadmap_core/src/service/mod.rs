//! Core use-case services.
//!
//! # Responsibility
//! - Own the authoritative collections and expose the mutation contract.
//! - Keep callers decoupled from the storage medium.

pub mod roadmap_store;
