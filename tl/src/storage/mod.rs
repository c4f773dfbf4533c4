//! Durable key/value storage and the persistence adapter built on it
//!
//! The store is a flat string-keyed, string-valued map. Two keys are used:
//!
//! ```text
//! minimal_todos_v1   # JSON array of {id, text, completed}
//! minimal_theme_v1   # "light" | "dark"
//! ```

mod file;
mod memory;
mod persistence;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use persistence::{Persistence, TASKS_KEY, THEME_KEY};

use thiserror::Error;

/// Errors from the underlying key/value store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// String-keyed, string-valued durable store
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read a value; Ok(None) when the key is absent
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a key; absent keys are not an error
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// Check that a key is usable as a storage name
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
