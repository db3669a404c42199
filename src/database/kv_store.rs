//! Key-value persistence boundary.
//!
//! [`KeyValueStore`] is the async get/set storage the history store persists
//! through. [`SqliteStore`] keeps values in the `kv_store` table;
//! [`MemoryStore`] keeps them in a map and can be told to fail, which is how
//! the transient-failure paths are exercised.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::connection::Database;
use crate::types::errors::StorageError;

/// Async keyed storage of JSON values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

/// SQLite-backed store.
pub struct SqliteStore {
    db: Mutex<Database>,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::new(Database::open_in_memory()?))
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let raw = {
            let db = self
                .db
                .lock()
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            db.read_value(key)?
        };
        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let text = serde_json::to_string(&value)?;
        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        db.write_value(key, &text)?;
        Ok(())
    }
}

/// In-memory store with switchable failure injection.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one value.
    pub fn with_value(key: &str, value: Value) -> Self {
        let store = Self::default();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.to_string(), value);
        }
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns a copy of the stored value without going through the async API.
    pub fn snapshot(&self, key: &str) -> Option<Value> {
        self.values.lock().ok()?.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("reads disabled".to_string()));
        }
        let values = self
            .values
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        let mut values = self
            .values
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}
