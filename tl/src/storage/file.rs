//! File-backed key/value store
//!
//! ```text
//! <data-dir>/
//! ├── minimal_todos_v1
//! └── minimal_theme_v1
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use tracing::debug;

use super::{KeyValueStore, StorageError, StorageResult, validate_key};

/// One file per key under a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Open or create a store at the given directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;
        debug!(?base_path, "Opened file store");
        Ok(Self { base_path })
    }

    /// Directory holding the key files
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    fn key_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(key))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.key_path(key)?;
        // Write-then-rename so readers never see a partial value
        let tmp_path = self.base_path.join(format!(".{}.tmp", key));
        fs::write(&tmp_path, value).map_err(|e| io_error(key, e))?;
        fs::rename(&tmp_path, &path).map_err(|e| io_error(key, e))?;
        debug!(%key, bytes = value.len(), "FileStore::set_item: written");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}
