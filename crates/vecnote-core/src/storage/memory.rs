//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::notes::FileSystem;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Values are kept serialized, the same way a browser keeps them.
#[derive(Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text under `key`, bypassing serialization.
    pub fn insert_raw(&self, key: &str, json: &str) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), json.to_string());
        }
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, fs: &FileSystem) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        let json = fs.to_json();
        Box::pin(async move {
            let json = json?;
            let mut values = self.values.write().map_err(lock_error)?;
            values.insert(key, json);
            Ok(())
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<FileSystem>> {
        let key = key.to_string();
        Box::pin(async move {
            let values = self.values.read().map_err(lock_error)?;
            let json = values.get(&key).ok_or_else(|| StorageError::NotFound(key.clone()))?;
            FileSystem::from_json(json)
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            let mut values = self.values.write().map_err(lock_error)?;
            values.remove(&key);
            Ok(())
        })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let key = key.to_string();
        Box::pin(async move {
            let values = self.values.read().map_err(lock_error)?;
            Ok(values.contains_key(&key))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::block_on;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let fs = FileSystem::default();

        block_on(storage.save("notes", &fs)).unwrap();
        let loaded = block_on(storage.load("notes")).unwrap();

        assert_eq!(fs, loaded);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));

        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();
        let fs = FileSystem::default();

        assert!(!block_on(storage.exists("notes")).unwrap());
        block_on(storage.save("notes", &fs)).unwrap();
        assert!(block_on(storage.exists("notes")).unwrap());
        block_on(storage.delete("notes")).unwrap();
        assert!(!block_on(storage.exists("notes")).unwrap());
    }

    #[test]
    fn test_raw_values_are_migrated() {
        let storage = MemoryStorage::new();
        storage.insert_raw(
            "notes",
            r#"{"notes":{"a":{"id":"a","name":"A","activeTabId":"t",
                "createdAt":"2023-01-01T00:00:00Z","updatedAt":"2023-01-01T00:00:00Z",
                "tabs":[{"id":"t","name":"Tab 1","strokes":[]}]}}}"#,
        );
        let loaded = block_on(storage.load("notes")).unwrap();
        assert_eq!(loaded.note("a").unwrap().tabs[0].height, 2000.0);
    }
}
