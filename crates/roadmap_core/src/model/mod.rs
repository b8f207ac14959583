//! Domain model for projects and their roadmap items.
//!
//! # Responsibility
//! - Define the canonical records held by the store and rendered by views.
//! - Keep the persisted JSON shape compatible with existing blobs.
//!
//! # Invariants
//! - Every record is identified by a stable UUID that is never regenerated;
//!   free-form ids from older blobs are mapped onto UUIDs when decoded.
//! - Titles are non-blank for every record accepted through a draft or update.
//! - Items are owned by exactly one project; ownership is never reassigned
//!   by lifecycle helpers.

pub mod id;
pub mod project;
pub mod roadmap_item;
pub mod seed;
pub mod theme;
pub mod validation;
