//! On-device key/value storage for UI state.
//!
//! # Responsibility
//! - Persist small string documents (the wizard aggregate) across launches.
//!
//! # Invariants
//! - `set_item` replaces any previous value for the key.
//! - Reading an absent key is `Ok(None)`, never an error.

use crate::db::{ensure_tables, DbError};
use log::error;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, PoisonError};

pub type LocalStoreResult<T> = Result<T, LocalStoreError>;

#[derive(Debug)]
pub enum LocalStoreError {
    Db(DbError),
}

impl Display for LocalStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "local storage failed: {err}"),
        }
    }
}

impl Error for LocalStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for LocalStoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for LocalStoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Browser-style string storage.
pub trait LocalStore {
    fn get_item(&self, key: &str) -> LocalStoreResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> LocalStoreResult<()>;
    fn remove_item(&self, key: &str) -> LocalStoreResult<()>;
}

/// `local_kv` table on the device database.
pub struct SqliteLocalStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLocalStore<'conn> {
    pub fn try_new(conn: &'conn Connection) -> LocalStoreResult<Self> {
        ensure_tables(conn, &["local_kv"])?;
        Ok(Self { conn })
    }
}

impl LocalStore for SqliteLocalStore<'_> {
    fn get_item(&self, key: &str) -> LocalStoreResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM local_kv WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> LocalStoreResult<()> {
        let result = self.conn.execute(
            "INSERT INTO local_kv (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        );
        if let Err(err) = result {
            error!("event=local_store_set module=repo status=error key={key} error={err}");
            return Err(err.into());
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> LocalStoreResult<()> {
        self.conn
            .execute("DELETE FROM local_kv WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// Process-local store for callers without a device database.
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_items<T>(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> T) -> T {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut items)
    }
}

impl LocalStore for MemoryLocalStore {
    fn get_item(&self, key: &str) -> LocalStoreResult<Option<String>> {
        Ok(self.with_items(|items| items.get(key).cloned()))
    }

    fn set_item(&self, key: &str, value: &str) -> LocalStoreResult<()> {
        self.with_items(|items| items.insert(key.to_string(), value.to_string()));
        Ok(())
    }

    fn remove_item(&self, key: &str) -> LocalStoreResult<()> {
        self.with_items(|items| items.remove(key));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{LocalStore, MemoryLocalStore};

    #[test]
    fn memory_store_replaces_and_removes() {
        let store = MemoryLocalStore::new();
        assert_eq!(store.get_item("k").unwrap(), None);
        store.set_item("k", "a").unwrap();
        store.set_item("k", "b").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("b"));
        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
    }
}
