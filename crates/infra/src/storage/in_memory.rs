use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value as JsonValue;

use super::{KeyValueStore, StorageError};

/// In-memory key-value store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    inner: RwLock<HashMap<String, JsonValue>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently holding a document, sorted.
    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        let map = self.inner.read().map_err(|_| StorageError::LockPoisoned)?;
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>, StorageError> {
        let map = self.inner.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<(), StorageError> {
        let mut map = self.inner.write().map_err(|_| StorageError::LockPoisoned)?;
        map.insert(key.to_string(), value);
        Ok(())
    }

    fn write_batch(&self, entries: Vec<(String, JsonValue)>) -> Result<(), StorageError> {
        let mut map = self.inner.write().map_err(|_| StorageError::LockPoisoned)?;
        map.extend(entries);
        Ok(())
    }
}
