//! Derived list views.
//!
//! # Responsibility
//! - Compute, from raw collections, the exact lists each screen renders.
//!
//! # Invariants
//! - Every view is a pure function of its inputs; nothing is cached.
//! - Sorting is stable: ties keep the input collection's relative order.

pub mod dashboard;
pub mod project_items;
pub mod recent;
