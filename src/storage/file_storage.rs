use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::KeyValueStorage;
use crate::error::{GalaxyError, Result};

pub const GALAXY_DIR: &str = ".galaxy";

/// Storage backed by one `<key>.json` file per key under `.galaxy/`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Initialize a new galaxy project
    pub fn init(root: &Path) -> Result<Self> {
        let dir = root.join(GALAXY_DIR);

        if dir.exists() {
            return Err(GalaxyError::AlreadyInitialized);
        }

        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "initialized storage");

        Ok(Self { dir })
    }

    /// Open an existing galaxy project
    pub fn open(root: &Path) -> Result<Self> {
        let dir = root.join(GALAXY_DIR);

        if !dir.is_dir() {
            return Err(GalaxyError::NotInitialized);
        }

        Ok(Self { dir })
    }

    /// Get the storage directory path
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(GalaxyError::Storage(format!("invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::write(&path, value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_galaxy_directory() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::init(tmp.path()).unwrap();

        assert!(tmp.path().join(".galaxy").is_dir());
        assert_eq!(storage.dir(), tmp.path().join(".galaxy"));
    }

    #[test]
    fn test_init_fails_if_already_initialized() {
        let tmp = TempDir::new().unwrap();
        FileStorage::init(tmp.path()).unwrap();

        let result = FileStorage::init(tmp.path());
        assert!(matches!(result, Err(GalaxyError::AlreadyInitialized)));
    }

    #[test]
    fn test_open_fails_if_not_initialized() {
        let tmp = TempDir::new().unwrap();

        let result = FileStorage::open(tmp.path());
        assert!(matches!(result, Err(GalaxyError::NotInitialized)));
    }

    #[test]
    fn test_values_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::init(tmp.path()).unwrap();
        storage.set_item("reviews", r#"[{"id":"1"}]"#).unwrap();

        let reopened = FileStorage::open(tmp.path()).unwrap();
        assert_eq!(
            reopened.get_item("reviews").unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );
        assert!(tmp.path().join(".galaxy/reviews.json").exists());
    }

    #[test]
    fn test_missing_key_and_remove() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::init(tmp.path()).unwrap();

        assert_eq!(storage.get_item("userRole").unwrap(), None);
        storage.remove_item("userRole").unwrap();

        storage.set_item("userRole", "\"admin\"").unwrap();
        storage.remove_item("userRole").unwrap();
        assert_eq!(storage.get_item("userRole").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::init(tmp.path()).unwrap();

        assert!(matches!(
            storage.set_item("../escape", "{}"),
            Err(GalaxyError::Storage(_))
        ));
    }
}
