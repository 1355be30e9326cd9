//! Persistence for the note file system.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use crate::notes::FileSystem;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Key the browser app stores its file system under.
pub const DEFAULT_STORAGE_KEY: &str = "vector-notes-app";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for file system storage backends.
///
/// Backends store the serialized JSON and parse it back through
/// [`FileSystem::from_json`], so older layouts are upgraded on load.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Save the file system under `key`.
    fn save(&self, key: &str, fs: &FileSystem) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the file system stored under `key`.
    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<FileSystem>>;

    /// Remove whatever is stored under `key`.
    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Check if anything is stored under `key`.
    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Trait for file system storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    /// Save the file system under `key`.
    fn save(&self, key: &str, fs: &FileSystem) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the file system stored under `key`.
    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<FileSystem>>;

    /// Remove whatever is stored under `key`.
    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Check if anything is stored under `key`.
    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Load the stored file system, falling back to the default one.
///
/// A value that cannot be parsed is logged and removed.
pub async fn load_or_default(storage: &dyn Storage, key: &str) -> FileSystem {
    match storage.load(key).await {
        Ok(fs) => fs,
        Err(StorageError::NotFound(_)) => FileSystem::default(),
        Err(StorageError::Serialization(e)) => {
            log::error!("Failed to parse stored notes: {e}");
            if let Err(e) = storage.delete(key).await {
                log::warn!("Failed to remove unreadable notes: {e}");
            }
            FileSystem::default()
        }
        Err(e) => {
            log::error!("Failed to load notes: {e}");
            FileSystem::default()
        }
    }
}

#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    // Simple blocking executor for tests
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}
