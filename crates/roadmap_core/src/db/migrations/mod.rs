//! Schema steps tracked by `PRAGMA user_version`.
//!
//! Step `n` in [`STEPS`] upgrades a database from version `n` to `n + 1`.
//! Steps are append-only; shipped steps are never edited.

use crate::repo::blob_repo::{BlobError, BlobResult};
use log::info;
use rusqlite::Connection;

const STEPS: &[&str] = &[include_str!("0001_blobs.sql")];

/// Schema version produced by the last known step.
pub fn latest_version() -> u32 {
    STEPS.len() as u32
}

/// Brings the connection up to [`latest_version`], one transaction per step.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the database is ahead of this build.
pub fn apply_migrations(conn: &mut Connection) -> BlobResult<()> {
    let from_version = current_user_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        return Err(BlobError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    for (index, sql) in STEPS.iter().enumerate().skip(from_version as usize) {
        let version = index as u32 + 1;
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
        info!("event=db_migrate module=db status=ok version={version}");
    }
    Ok(())
}

/// Reads the schema version recorded on the connection.
pub fn current_user_version(conn: &Connection) -> BlobResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}
