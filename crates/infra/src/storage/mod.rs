//! Durable key-value persistence port.
//!
//! The store keeps three independently keyed collections (items, bids,
//! donation claims), each a JSON array. Adapters only need to get and set
//! whole JSON documents by key.

pub mod in_memory;
pub mod json_file;

use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;

pub use in_memory::InMemoryKeyValueStore;
pub use json_file::JsonFileStore;

/// Key-value persistence of JSON documents.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<JsonValue>, StorageError>;

    fn set(&self, key: &str, value: JsonValue) -> Result<(), StorageError>;

    /// Write several keys as one unit.
    ///
    /// The default applies the entries one by one; the adapters in this crate
    /// override it so that either all entries land or none do.
    fn write_batch(&self, entries: Vec<(String, JsonValue)>) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(&key, value)?;
        }
        Ok(())
    }
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<JsonValue>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn write_batch(&self, entries: Vec<(String, JsonValue)>) -> Result<(), StorageError> {
        (**self).write_batch(entries)
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage document is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("storage lock poisoned")]
    LockPoisoned,
}
