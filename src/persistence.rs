//! Parameter store backends for lockup state
//!
//! Each parameter lives under its own `(namespace, key)` entry so governance
//! can replace one field without re-encoding the others. Values are stored as
//! JSON produced by [`Subspace`].

use crate::error::{LockupError, Result};
use parking_lot::RwLock;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Abstraction for parameter storage backends. Implementations must give a
/// consistent view for the duration of one admission check.
pub trait ParamStore: Send + Sync {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>>;
    fn set(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<()>;

    fn has(&self, namespace: &str, key: &str) -> Result<bool> {
        Ok(self.get(namespace, key)?.is_some())
    }
}

/// rusqlite-backed parameter store
pub struct SqliteParamStore {
    conn: Mutex<Connection>,
}

impl SqliteParamStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| LockupError::Store(format!("Failed to open database: {}", e)))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| LockupError::Store(format!("Failed to open database: {}", e)))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS params (
                namespace TEXT NOT NULL,
                key TEXT NOT NULL,
                value BLOB NOT NULL,
                PRIMARY KEY (namespace, key)
            )",
            [],
        )
        .map_err(|e| LockupError::Store(format!("Failed to create params table: {}", e)))?;

        Ok(SqliteParamStore {
            conn: Mutex::new(conn),
        })
    }
}

impl ParamStore for SqliteParamStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| LockupError::Store("Mutex poisoned".to_string()))?;
        let value = conn
            .query_row(
                "SELECT value FROM params WHERE namespace = ?1 AND key = ?2",
                params![namespace, key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()
            .map_err(|e| LockupError::Store(format!("Failed to read param {}/{}: {}", namespace, key, e)))?;
        Ok(value)
    }

    fn set(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| LockupError::Store("Mutex poisoned".to_string()))?;
        conn.execute(
            "INSERT OR REPLACE INTO params (namespace, key, value) VALUES (?1, ?2, ?3)",
            params![namespace, key, value],
        )
        .map_err(|e| LockupError::Store(format!("Failed to write param {}/{}: {}", namespace, key, e)))?;
        Ok(())
    }
}

/// Simple in-memory store useful for tests and ephemeral runs.
#[derive(Clone, Default)]
pub struct InMemoryParamStore {
    entries: Arc<RwLock<HashMap<(String, String), Vec<u8>>>>,
}

impl InMemoryParamStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ParamStore for InMemoryParamStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .entries
            .read()
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<()> {
        self.entries
            .write()
            .insert((namespace.to_string(), key.to_string()), value);
        Ok(())
    }
}

/// Typed view over one namespace of a [`ParamStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subspace {
    name: &'static str,
}

impl Subspace {
    pub const fn new(name: &'static str) -> Self {
        Subspace { name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn has(&self, store: &dyn ParamStore, key: &str) -> Result<bool> {
        store.has(self.name, key)
    }

    /// Returns the decoded value, or `None` if the entry was never written.
    pub fn get_if_exists<T: DeserializeOwned>(
        &self,
        store: &dyn ParamStore,
        key: &str,
    ) -> Result<Option<T>> {
        match store.get(self.name, key)? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|e| {
                    LockupError::Store(format!("Failed to decode param {}/{}: {}", self.name, key, e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&self, store: &dyn ParamStore, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        store.set(self.name, key, bytes)
    }
}
