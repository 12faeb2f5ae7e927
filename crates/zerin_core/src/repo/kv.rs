//! Persistent key-value storage contract and implementations.
//!
//! # Responsibility
//! - Define the `KvStore` trait the typed stores are built on.
//! - Provide the SQLite-backed production implementation and an in-memory
//!   fake for tests and embedders.
//!
//! # Invariants
//! - Values are JSON documents; codec failures surface as
//!   `StoreError::Codec`, never a panic.
//! - `SqliteKvStore::try_new` rejects connections whose schema has not been
//!   migrated.

use crate::db::DbError;
use crate::db::migrations::latest_version;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key names, preserved from the original deployment's localStorage
/// layout so existing exports can be imported unchanged.
pub mod keys {
    /// Array of `User`.
    pub const USERS: &str = "zerin_users";
    /// Single `User`, absent when nobody is logged in.
    pub const CURRENT_USER: &str = "zerin_current_user";
    /// Array of `KnowledgeSource`.
    pub const KNOWLEDGE: &str = "zerin_knowledge_base";
    /// Single `PersonaConfig`.
    pub const PERSONA: &str = "zerin_persona";
    /// Single `AvatarMediaConfig`.
    pub const AVATAR_MEDIA: &str = "zerin_config";
    /// Array of `Task`.
    pub const TASKS: &str = "zerin_tasks";
    /// Array of `EventEntry` (schedule).
    pub const SCHEDULE: &str = "zerin_schedule";
    /// Array of `EventEntry` (meetings).
    pub const MEETINGS: &str = "zerin_meetings";
    /// Array of `Note`.
    pub const NOTES: &str = "zerin_notes";
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence and codec errors raised by the storage boundary.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Codec {
        key: String,
        source: serde_json::Error,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Codec { key, source } => {
                write!(f, "invalid JSON document under key `{key}`: {source}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Codec { source, .. } => Some(source),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string-keyed storage with synchronous get/set/remove.
///
/// The single seam between the typed stores and whatever holds the bytes;
/// inject `MemoryKvStore` to run the whole core without a database.
pub trait KvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// SQLite-backed key-value store over the `cells` table.
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let has_cells: u32 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'cells';",
            [],
            |row| row.get(0),
        )?;
        if has_cells == 0 {
            return Err(StoreError::MissingRequiredTable("cells"));
        }

        Ok(Self { conn })
    }
}

impl KvStore for SqliteKvStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM cells WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO cells (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM cells WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// In-process key-value store for tests and database-free embedders.
///
/// Single-threaded by design; the core has exactly one logical writer.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    cells: RefCell<BTreeMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.cells.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.cells
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.cells.borrow_mut().remove(key);
        Ok(())
    }
}

/// Reads and decodes the JSON document under `key`.
pub(crate) fn read_json<S: KvStore + ?Sized, T: DeserializeOwned>(
    kv: &S,
    key: &str,
) -> StoreResult<Option<T>> {
    match kv.get(key)? {
        Some(raw) => {
            let value = serde_json::from_str(&raw).map_err(|source| StoreError::Codec {
                key: key.to_string(),
                source,
            })?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Encodes `value` and writes it under `key`.
pub(crate) fn write_json<S: KvStore + ?Sized, T: Serialize>(
    kv: &S,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Codec {
        key: key.to_string(),
        source,
    })?;
    kv.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::{read_json, write_json, KvStore, MemoryKvStore};

    #[test]
    fn memory_store_roundtrips_and_removes() {
        let kv = MemoryKvStore::new();
        assert!(kv.get("missing").unwrap().is_none());

        kv.set("k", "v").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("v"));

        kv.remove("k").unwrap();
        assert!(kv.get("k").unwrap().is_none());
    }

    #[test]
    fn json_helpers_roundtrip_collections() {
        let kv = MemoryKvStore::new();
        write_json(&kv, "list", &vec![1u32, 2, 3]).unwrap();
        let loaded: Vec<u32> = read_json(&kv, "list").unwrap().unwrap();
        assert_eq!(loaded, vec![1, 2, 3]);
    }

    #[test]
    fn corrupt_value_surfaces_as_codec_error() {
        let kv = MemoryKvStore::new();
        kv.set("list", "not json").unwrap();
        let result: super::StoreResult<Option<Vec<u32>>> = read_json(&kv, "list");
        assert!(matches!(
            result,
            Err(super::StoreError::Codec { ref key, .. }) if key == "list"
        ));
    }
}
