//! Durable local storage backing the balance store
//!
//! Two string keys: the balance as a decimal-string integer and a loading
//! flag as a boolean string. Values that fail to read are treated as absent.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

pub trait BalanceStorage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// JSON-file-backed storage: a single flat string map on disk
///
/// The whole map is rewritten on every mutation; at two small keys this is
/// cheaper than being clever.
pub struct FileStorage {
    path: PathBuf,
    cache: HashMap<String, String>,
}

impl FileStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let cache = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Corrupt storage file, starting empty");
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, cache })
    }

    fn flush(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.cache)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl BalanceStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cache.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.cache.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// In-memory storage for tests; writes can be made to fail to exercise the
/// best-effort persistence path.
#[derive(Default)]
pub struct MemoryStorage {
    map: HashMap<String, String>,
    pub fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.map.insert(key.to_string(), value.to_string());
        storage
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.map.get(key)
    }
}

impl BalanceStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "storage unavailable",
            )));
        }
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}.json", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_file_storage_round_trip() {
        let path = temp_path("storage-round-trip");
        let mut storage = FileStorage::open(&path).unwrap();
        storage.write("user_balance", "1000000000").unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(
            reopened.read("user_balance").unwrap().as_deref(),
            Some("1000000000")
        );
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let storage = FileStorage::open(temp_path("storage-missing")).unwrap();
        assert_eq!(storage.read("user_balance").unwrap(), None);
    }

    #[test]
    fn test_file_storage_corrupt_file_starts_empty() {
        let path = temp_path("storage-corrupt");
        fs::write(&path, "not json at all").unwrap();
        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.read("user_balance").unwrap(), None);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_memory_storage_failing_writes() {
        let mut storage = MemoryStorage::new();
        storage.fail_writes = true;
        assert!(storage.write("user_balance", "1").is_err());
        assert_eq!(storage.read("user_balance").unwrap(), None);
    }
}
