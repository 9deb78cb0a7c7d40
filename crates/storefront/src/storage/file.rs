//! Filesystem-backed storage.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{LocalStorage, StorageError, validate_key};

/// Stores each key as `<root>/<key>.json`.
///
/// Writes land in a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `root`. The directory is created lazily on
    /// first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.root.join(format!(".{key}.json.tmp"))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        match fs::read_to_string(self.item_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        fs::create_dir_all(&self.root)?;
        let temp = self.temp_path(key);
        fs::write(&temp, value)?;
        fs::rename(&temp, self.item_path(key))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        match fs::remove_file(self.item_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct TestContext {
        root: TempDir,
    }

    impl TestContext {
        fn new() -> Self {
            Self {
                root: TempDir::new().unwrap(),
            }
        }

        fn storage(&self) -> FileStorage {
            FileStorage::new(self.root.path().join("data"))
        }
    }

    #[test]
    fn test_missing_key_reads_none() {
        let ctx = TestContext::new();
        assert_eq!(ctx.storage().get_item("cart").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let ctx = TestContext::new();
        let storage = ctx.storage();
        storage.set_item("cart", "[]").unwrap();
        assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("[]"));
        assert!(storage.root().join("cart.json").exists());
    }

    #[test]
    fn test_overwrite_leaves_no_temp_file() {
        let ctx = TestContext::new();
        let storage = ctx.storage();
        storage.set_item("wishlist", "[1]").unwrap();
        storage.set_item("wishlist", "[2]").unwrap();
        assert_eq!(storage.get_item("wishlist").unwrap().as_deref(), Some("[2]"));
        assert!(!storage.root().join(".wishlist.json.tmp").exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let ctx = TestContext::new();
        let storage = ctx.storage();
        storage.set_item("cart", "[]").unwrap();
        storage.remove_item("cart").unwrap();
        storage.remove_item("cart").unwrap();
        assert_eq!(storage.get_item("cart").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_traversal() {
        let ctx = TestContext::new();
        let err = ctx.storage().set_item("../escape", "x").unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
