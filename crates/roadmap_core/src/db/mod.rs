//! SQLite bootstrap for the blob store.
//!
//! Connections returned from here carry the `blobs` table at the latest schema
//! version. Failures surface as [`crate::repo::blob_repo::BlobError`].

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
