// Key-value stores backing the cache.
// A file-per-key store for normal runs and an in-memory store for ephemeral sessions.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{CatalogError, Result};

use super::paths::key_path;

/// Whole-value get/set storage. Reads never fail: unreadable values are absent.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Stores each key as `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = key_path(&self.root, key);
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "unreadable cache entry");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = key_path(&self.root, key);

        // Write atomically via temp file
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(value)?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = key_path(&self.root, key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CatalogError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CatalogError::Storage(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("store"));

        assert!(store.get("icon-cache").is_none());
        store.set("icon-cache", b"{\"a\":1}").unwrap();
        assert_eq!(store.get("icon-cache").unwrap(), b"{\"a\":1}");

        store.set("icon-cache", b"[]").unwrap();
        assert_eq!(store.get("icon-cache").unwrap(), b"[]");
        assert!(!temp_dir.path().join("store/icon-cache.tmp").exists());
    }

    #[test]
    fn test_file_store_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.set("dark-mode", b"true").unwrap();
        store.remove("dark-mode").unwrap();
        assert!(store.get("dark-mode").is_none());

        // Removing an absent key is fine
        store.remove("dark-mode").unwrap();
    }

    #[test]
    fn test_file_store_unwritable_root() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let store = FileStore::new(blocker.join("store"));
        assert!(store.set("icon-cache", b"{}").is_err());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.get("k").is_none());
        store.set("k", b"v").unwrap();
        assert_eq!(store.get("k").unwrap(), b"v");
        store.remove("k").unwrap();
        assert!(store.get("k").is_none());
    }
}
