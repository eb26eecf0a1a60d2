use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::StorageError;

/// Durable string key/value storage shared by the client stores.
///
/// Implementations use interior mutability so one storage handle can back
/// several stores at once.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One JSON document per key under a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_err = |source| StorageError::Io {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_err)?;

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, value).map_err(io_err)?;
        std::fs::rename(&temp_path, &path).map_err(io_err)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

/// In-process storage, optionally limited to a total byte budget like a
/// browser's quota-limited local storage.
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            values: Mutex::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values();
        if let Some(limit) = self.quota_bytes {
            let others: usize = values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values().remove(key);
        Ok(())
    }
}

/// Load a JSON document, treating missing, unreadable or corrupt data as absent.
pub(crate) fn load_json<T: DeserializeOwned>(storage: &dyn KeyValueStorage, key: &str) -> Option<T> {
    let content = match storage.get(key) {
        Ok(Some(content)) => content,
        Ok(None) => {
            debug!("No stored data for {}", key);
            return None;
        }
        Err(e) => {
            warn!("Failed to read {}: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Stored data for {} is corrupted, starting empty: {}", key, e);
            None
        }
    }
}

/// Write a JSON document. Failures are logged and swallowed; the caller's
/// in-memory state stays authoritative.
pub(crate) fn persist_json<T: Serialize + ?Sized>(storage: &dyn KeyValueStorage, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })
        .and_then(|encoded| storage.set(key, &encoded));

    match result {
        Ok(()) => debug!("Persisted {}", key),
        Err(e) => warn!("Failed to persist {}: {}", key, e),
    }
}

pub(crate) fn remove_key(storage: &dyn KeyValueStorage, key: &str) {
    if let Err(e) = storage.remove(key) {
        warn!("Failed to remove {}: {}", key, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage"));

        assert_eq!(storage.get("mflix.watchlist").unwrap(), None);
        storage.set("mflix.watchlist", "[1,2]").unwrap();
        assert_eq!(storage.get("mflix.watchlist").unwrap().as_deref(), Some("[1,2]"));
        assert!(dir.path().join("storage/mflix.watchlist.json").exists());
        assert!(!dir.path().join("storage/mflix.watchlist.tmp").exists());

        storage.set("mflix.watchlist", "[]").unwrap();
        assert_eq!(storage.get("mflix.watchlist").unwrap().as_deref(), Some("[]"));

        storage.remove("mflix.watchlist").unwrap();
        assert_eq!(storage.get("mflix.watchlist").unwrap(), None);
        // removing twice is fine
        storage.remove("mflix.watchlist").unwrap();
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(matches!(storage.set("../escape", "x"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(storage.get("a/b"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(storage.get(""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_memory_storage_quota() {
        let storage = MemoryStorage::with_quota(16);
        storage.set("k", "0123456789").unwrap();
        // replacing a value only counts the new size
        storage.set("k", "abcdefghij").unwrap();

        let err = storage.set("other", "0123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(storage.get("other").unwrap(), None);
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("abcdefghij"));
    }

    #[test]
    fn test_load_json_tolerates_corruption() {
        let storage = MemoryStorage::new();
        storage.set("bad", "{not json").unwrap();
        storage.set("good", "[\"a\"]").unwrap();

        assert_eq!(load_json::<Vec<String>>(&storage, "bad"), None);
        assert_eq!(load_json::<Vec<String>>(&storage, "missing"), None);
        assert_eq!(load_json::<Vec<String>>(&storage, "good"), Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_persist_json_swallows_failures() {
        let storage = MemoryStorage::with_quota(4);
        persist_json(&storage, "key", &vec!["too long to fit"]);
        assert_eq!(storage.get("key").unwrap(), None);
    }
}
