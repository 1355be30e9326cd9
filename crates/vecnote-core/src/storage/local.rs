//! `window.localStorage` backend for WebAssembly.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::notes::FileSystem;

/// Browser local storage. Keys map directly to local storage items.
#[derive(Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> StorageResult<web_sys::Storage> {
        let window = web_sys::window().ok_or_else(|| StorageError::Other("No window object".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Other(format!("localStorage error: {:?}", e)))?
            .ok_or_else(|| StorageError::Other("localStorage not available".to_string()))
    }
}

impl Storage for LocalStorage {
    fn save(&self, key: &str, fs: &FileSystem) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        let json = fs.to_json();
        Box::pin(async move {
            Self::storage()?
                .set_item(&key, &json?)
                .map_err(|e| StorageError::Io(format!("Failed to write {key}: {:?}", e)))
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<FileSystem>> {
        let key = key.to_string();
        Box::pin(async move {
            let json = Self::storage()?
                .get_item(&key)
                .map_err(|e| StorageError::Io(format!("Failed to read {key}: {:?}", e)))?
                .ok_or_else(|| StorageError::NotFound(key.clone()))?;
            FileSystem::from_json(&json)
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            Self::storage()?
                .remove_item(&key)
                .map_err(|e| StorageError::Io(format!("Failed to delete {key}: {:?}", e)))
        })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let key = key.to_string();
        Box::pin(async move {
            let item = Self::storage()?
                .get_item(&key)
                .map_err(|e| StorageError::Io(format!("Failed to read {key}: {:?}", e)))?;
            Ok(item.is_some())
        })
    }
}
