//! Durable key-value storage for client-side state.
//!
//! The cart and wishlist each serialize their full state to a single string
//! record under a fixed key. Storage is deliberately dumb: it knows nothing
//! about the records' shape, and readers are responsible for treating a
//! corrupt record as absent.
//!
//! # Backends
//!
//! - [`FileStorage`] - one `<key>.json` file per key under a data directory
//! - [`MemoryStorage`] - process-local map, for tests and throwaway sessions

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key contains characters that are not allowed.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// A writer panicked while holding the storage lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Key-value storage with string records.
pub trait LocalStorage: Send + Sync {
    /// Read the record stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the record stored under `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Keys are non-empty ASCII alphanumerics, `-` or `_`.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
