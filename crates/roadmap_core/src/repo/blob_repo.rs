//! Key-value blob store contract and implementations.
//!
//! # Responsibility
//! - Store each collection as one JSON document under a string key.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Loaders return the caller's default for absent, unreadable or
//!   malformed values and log why.
//! - Collections decode record by record; a record that fails to decode is
//!   skipped and the raw document is handed back so it can be preserved.
//! - `save_json` either writes the complete document or reports an error.

use crate::db::migrations::{current_user_version, latest_version};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key of the project collection.
pub const PROJECTS_KEY: &str = "projects";
/// Storage key of the roadmap item collection.
pub const ROADMAP_ITEMS_KEY: &str = "roadmapItems";
/// Storage key of the theme preference.
pub const THEME_KEY: &str = "theme";

pub type BlobResult<T> = Result<T, BlobError>;

/// Error for database bootstrap, blob reads, writes and connection checks.
#[derive(Debug)]
pub enum BlobError {
    Sqlite(rusqlite::Error),
    /// The database was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    Serialize(serde_json::Error),
    /// The write would push total stored bytes past the configured quota.
    QuotaExceeded {
        key: String,
        required_bytes: usize,
        quota_bytes: usize,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for BlobError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Serialize(err) => write!(f, "failed to serialize blob: {err}"),
            Self::QuotaExceeded {
                key,
                required_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: {required_bytes} bytes needed, {quota_bytes} allowed"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for BlobError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for BlobError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for BlobError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Key-value storage for serialized documents.
pub trait BlobStore {
    /// Returns the raw document stored under `key`, if any.
    fn read(&self, key: &str) -> BlobResult<Option<String>>;
    /// Replaces the document stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> BlobResult<()>;
}

/// A decoded blob and, when decoding was lossy, the raw stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub value: T,
    /// Set when the stored document was present but not decoded in full.
    pub undecoded: Option<String>,
}

impl<T> Loaded<T> {
    fn clean(value: T) -> Self {
        Self {
            value,
            undecoded: None,
        }
    }

    fn lossy(value: T, raw: String) -> Self {
        Self {
            value,
            undecoded: Some(raw),
        }
    }
}

/// Loads and decodes the JSON document under `key`.
///
/// Falls back to `default` when the key is absent, the read fails, or the
/// document does not decode as `T`.
pub fn load_json<T, B>(store: &B, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    B: BlobStore + ?Sized,
{
    load_value(store, key, default).value
}

/// Like [`load_json`], also returning the raw document when it was rejected.
pub fn load_value<T, B>(store: &B, key: &str, default: T) -> Loaded<T>
where
    T: DeserializeOwned,
    B: BlobStore + ?Sized,
{
    let Some(raw) = read_raw(store, key) else {
        return Loaded::clean(default);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => {
            debug!(
                "event=blob_load module=repo status=ok key={} bytes={}",
                key,
                raw.len()
            );
            Loaded::clean(value)
        }
        Err(err) => {
            warn!(
                "event=blob_load module=repo status=default reason=malformed key={} error={}",
                key, err
            );
            Loaded::lossy(default, raw)
        }
    }
}

/// Loads a JSON array under `key`, decoding each element on its own.
///
/// Elements that do not decode as `T` are skipped and logged. A document that
/// is not a JSON array yields `default`.
pub fn load_records<T, B>(store: &B, key: &str, default: Vec<T>) -> Loaded<Vec<T>>
where
    T: DeserializeOwned,
    B: BlobStore + ?Sized,
{
    let Some(raw) = read_raw(store, key) else {
        return Loaded::clean(default);
    };

    let elements = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(elements)) => elements,
        Ok(_) => {
            warn!("event=blob_load module=repo status=default reason=not_an_array key={key}");
            return Loaded::lossy(default, raw);
        }
        Err(err) => {
            warn!(
                "event=blob_load module=repo status=default reason=malformed key={} error={}",
                key, err
            );
            return Loaded::lossy(default, raw);
        }
    };

    let total = elements.len();
    let mut records = Vec::with_capacity(total);
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value(element) {
            Ok(record) => records.push(record),
            Err(err) => warn!(
                "event=blob_load module=repo status=skipped key={} index={} error={}",
                key, index, err
            ),
        }
    }

    let skipped = total - records.len();
    debug!(
        "event=blob_load module=repo status=ok key={} records={} skipped={}",
        key,
        records.len(),
        skipped
    );
    if skipped == 0 {
        Loaded::clean(records)
    } else {
        Loaded::lossy(records, raw)
    }
}

fn read_raw<B>(store: &B, key: &str) -> Option<String>
where
    B: BlobStore + ?Sized,
{
    match store.read(key) {
        Ok(Some(raw)) => Some(raw),
        Ok(None) => {
            debug!("event=blob_load module=repo status=default reason=absent key={key}");
            None
        }
        Err(err) => {
            warn!(
                "event=blob_load module=repo status=default reason=read_failed key={} error={}",
                key, err
            );
            None
        }
    }
}

/// Encodes `value` as JSON and writes it under `key`.
pub fn save_json<T, B>(store: &mut B, key: &str, value: &T) -> BlobResult<()>
where
    T: Serialize + ?Sized,
    B: BlobStore + ?Sized,
{
    let encoded = serde_json::to_string(value)?;
    store.write(key, &encoded)?;
    debug!(
        "event=blob_save module=repo status=ok key={} bytes={}",
        key,
        encoded.len()
    );
    Ok(())
}

/// SQLite-backed blob store over a migrated connection.
pub struct SqliteBlobStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlobStore<'conn> {
    /// Wraps a connection prepared by [`crate::db::open_db`].
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` when the `blobs` table is absent.
    pub fn try_new(conn: &'conn Connection) -> BlobResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(BlobError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let has_table: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'blobs'
            );",
            [],
            |row| row.get(0),
        )?;
        if has_table == 0 {
            return Err(BlobError::MissingRequiredTable("blobs"));
        }

        Ok(Self { conn })
    }

    /// Lists stored keys in ascending order.
    pub fn keys(&self) -> BlobResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM blobs ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

impl BlobStore for SqliteBlobStore<'_> {
    fn read(&self, key: &str) -> BlobResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM blobs WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> BlobResult<()> {
        self.conn.execute(
            "INSERT INTO blobs (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-memory blob store with an optional byte quota.
///
/// The quota counts key and value bytes of every stored entry, mirroring the
/// per-origin limit of browser storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    entries: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Changes the quota; `None` removes the limit.
    pub fn set_quota(&mut self, quota_bytes: Option<usize>) {
        self.quota_bytes = quota_bytes;
    }

    /// Stores a raw value without quota checks, e.g. to plant corrupt data.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> BlobResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> BlobResult<()> {
        if let Some(quota_bytes) = self.quota_bytes {
            let replaced = self
                .entries
                .get(key)
                .map_or(0, |existing| key.len() + existing.len());
            let required_bytes = self.used_bytes() - replaced + key.len() + value.len();
            if required_bytes > quota_bytes {
                return Err(BlobError::QuotaExceeded {
                    key: key.to_string(),
                    required_bytes,
                    quota_bytes,
                });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{load_json, load_records, save_json, BlobError, BlobStore, MemoryBlobStore};

    #[test]
    fn load_json_falls_back_for_absent_and_malformed_values() {
        let mut store = MemoryBlobStore::new();
        assert_eq!(load_json(&store, "numbers", vec![7_u32]), vec![7]);

        store.insert_raw("numbers", "[1, 2,");
        assert_eq!(load_json(&store, "numbers", vec![7_u32]), vec![7]);

        store.insert_raw("numbers", "{\"not\": \"a list\"}");
        assert_eq!(load_json(&store, "numbers", Vec::<u32>::new()), Vec::<u32>::new());
    }

    #[test]
    fn load_records_skips_elements_that_do_not_decode() {
        let mut store = MemoryBlobStore::new();
        store.insert_raw("numbers", "[1, \"two\", 3]");

        let loaded = load_records(&store, "numbers", vec![7_u32]);
        assert_eq!(loaded.value, vec![1, 3]);
        assert_eq!(loaded.undecoded.as_deref(), Some("[1, \"two\", 3]"));
    }

    #[test]
    fn load_records_keeps_raw_document_when_falling_back() {
        let mut store = MemoryBlobStore::new();
        let loaded = load_records(&store, "numbers", vec![7_u32]);
        assert_eq!(loaded.value, vec![7]);
        assert_eq!(loaded.undecoded, None);

        store.insert_raw("numbers", "{\"not\": \"a list\"}");
        let loaded = load_records(&store, "numbers", vec![7_u32]);
        assert_eq!(loaded.value, vec![7]);
        assert_eq!(loaded.undecoded.as_deref(), Some("{\"not\": \"a list\"}"));

        store.insert_raw("numbers", "[1, 2]");
        let loaded = load_records(&store, "numbers", Vec::<u32>::new());
        assert_eq!(loaded.value, vec![1, 2]);
        assert_eq!(loaded.undecoded, None);
    }

    #[test]
    fn save_then_load_returns_same_value() {
        let mut store = MemoryBlobStore::new();
        save_json(&mut store, "numbers", &vec![1_u32, 2, 3]).unwrap();
        assert_eq!(load_json(&store, "numbers", Vec::<u32>::new()), vec![1, 2, 3]);
    }

    #[test]
    fn quota_rejects_oversized_write_and_keeps_previous_value() {
        let mut store = MemoryBlobStore::with_quota(16);
        store.write("k", "small").unwrap();

        let err = store.write("k", "this value is far too large").unwrap_err();
        assert!(matches!(err, BlobError::QuotaExceeded { quota_bytes: 16, .. }));
        assert_eq!(store.get_raw("k"), Some("small"));
    }

    #[test]
    fn quota_accounts_for_replaced_entry() {
        let mut store = MemoryBlobStore::with_quota(10);
        store.write("k", "123456789").unwrap();
        store.write("k", "987654321").unwrap();
        assert_eq!(store.used_bytes(), 10);
    }
}
