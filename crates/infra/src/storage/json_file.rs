use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value as JsonValue};

use super::{KeyValueStore, StorageError};

/// Key-value store backed by a single JSON document on disk.
///
/// The whole document is rewritten on every write: serialized to a sibling
/// temp file, then renamed over the original, so a crash never leaves a
/// half-written file and a batch lands all at once.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`. Parent directories are created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, JsonValue>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => return Err(io_error(&self.path, source)),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&raw).map_err(StorageError::Malformed)
    }

    fn write_document(&self, document: &Map<String, JsonValue>) -> Result<(), StorageError> {
        let encoded = serde_json::to_vec_pretty(document).map_err(StorageError::Malformed)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encoded).map_err(|source| io_error(&tmp, source))?;
        fs::rename(&tmp, &self.path).map_err(|source| io_error(&self.path, source))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut document = self.read_document()?;
        Ok(document.remove(key))
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<(), StorageError> {
        self.write_batch(vec![(key.to_string(), value)])
    }

    fn write_batch(&self, entries: Vec<(String, JsonValue)>) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut document = self.read_document()?;
        document.extend(entries);
        self.write_document(&document)
    }
}
