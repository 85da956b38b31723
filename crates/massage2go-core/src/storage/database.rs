//! SQLite-backed key-value store.
//!
//! Two scopes stand in for the browser's storage areas:
//! - [`StorageScope::Local`]: a file under the data directory that
//!   survives restarts (holds the current user).
//! - [`StorageScope::Session`]: an in-memory database that lives as long
//!   as the handle (page-to-page handoffs).

use std::path::Path;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::data_dir;
use crate::error::{DatabaseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    Local,
    Session,
}

pub struct Database {
    conn: Connection,
    scope: StorageScope,
}

impl Database {
    /// Open the persistent store at `<data_dir>/massage2go.db`.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("massage2go.db");
        Self::open_at(&path)
    }

    /// Open the persistent store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self {
            conn,
            scope: StorageScope::Local,
        };
        db.migrate()?;
        Ok(db)
    }

    /// Open a per-process session store. Contents vanish on drop.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn,
            scope: StorageScope::Session,
        };
        db.migrate()?;
        Ok(db)
    }

    pub fn scope(&self) -> StorageScope {
        self.scope
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key. Returns whether anything was removed.
    pub fn kv_remove(&self, key: &str) -> Result<bool, DatabaseError> {
        let n = self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(n > 0)
    }

    /// Store `value` as a JSON blob under `key`.
    pub fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.kv_set(key, &json)?;
        Ok(())
    }

    /// Read the JSON blob under `key`, if present.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.kv_get(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.scope(), StorageScope::Session);
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        assert!(db.kv_remove("test").unwrap());
        assert!(!db.kv_remove("test").unwrap());
        assert!(db.kv_get("test").unwrap().is_none());
    }

    #[test]
    fn json_blobs() {
        let db = Database::open_memory().unwrap();
        db.put_json("nums", &vec![1, 2, 3]).unwrap();
        let back: Option<Vec<i32>> = db.get_json("nums").unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));
        let missing: Option<Vec<i32>> = db.get_json("other").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        {
            let db = Database::open_at(&path).unwrap();
            assert_eq!(db.scope(), StorageScope::Local);
            db.kv_set("k", "v").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.kv_get("k").unwrap().as_deref(), Some("v"));
    }
}
