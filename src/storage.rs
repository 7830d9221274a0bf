//! Durable key/value storage for persisted client state.
//!
//! The override map and the rate cache each persist as a single JSON blob
//! under one namespaced key. Storage backends only move strings; encoding
//! is the caller's business.

use crate::error::{PricingError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// A string key/value store.
///
/// # Examples
///
/// ```rust
/// use buildprice::storage::{MemoryStorage, Storage};
///
/// let storage = MemoryStorage::new();
/// assert_eq!(storage.read("poe:divineRate").unwrap(), None);
///
/// storage.write("poe:divineRate", "{}").unwrap();
/// assert_eq!(storage.read("poe:divineRate").unwrap().as_deref(), Some("{}"));
/// ```
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }
}

/// In-process storage. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| PricingError::storage(key, e))?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| PricingError::storage(key, e))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed storage: one `<key>.json` file per key.
///
/// Bytes that are not safe in file names (such as the `:` in
/// `poe:priceOverridesDivine`) are hex-escaped; see [`FileStorage::path_for`].
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the storage directory. It is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file holding `key`.
    ///
    /// ASCII letters, digits, `-` and `.` are kept; every other byte is
    /// written as `_XX` in hex, so distinct keys never share a file.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut file_name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'.' {
                file_name.push(char::from(byte));
            } else {
                file_name.push_str(&format!("_{:02X}", byte));
            }
        }
        self.dir.join(format!("{}.json", file_name))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(PricingError::storage(key, err)),
        }
    }

    /// Writes a sibling temp file and renames it over the target, so a
    /// crash never leaves a truncated value behind.
    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| PricingError::storage(key, e))?;

        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value).map_err(|e| PricingError::storage(key, e))?;
        fs::rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            PricingError::storage(key, e)
        })
    }
}
