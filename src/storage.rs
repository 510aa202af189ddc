//! Document storage.
//!
//! Every document name is resolved against one root. Names are plain file
//! names: anything containing a path separator, or `.`/`..`, is rejected.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document not found: '{0}'")]
    NotFound(String),

    #[error("invalid document name: '{0}'")]
    InvalidName(String),

    #[error("failed to access '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Read/write access to the documents of one run.
pub trait Storage {
    /// Read the entire contents of a document.
    fn read(&self, name: &str) -> StorageResult<Vec<u8>>;

    /// Write a document, replacing it if it exists.
    fn write(&self, name: &str, data: &[u8]) -> StorageResult<()>;

    fn exists(&self, name: &str) -> bool {
        self.read(name).is_ok()
    }
}

pub fn validate_name(name: &str) -> StorageResult<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if bad {
        Err(StorageError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}

/// Documents stored as files directly under a root directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalStorage { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, name: &str) -> StorageResult<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

impl Storage for LocalStorage {
    fn read(&self, name: &str) -> StorageResult<Vec<u8>> {
        let path = self.resolve(name)?;
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(name.to_string()),
            _ => StorageError::Io {
                name: name.to_string(),
                source: e,
            },
        })
    }

    fn write(&self, name: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.resolve(name)?;
        fs::write(&path, data).map_err(|e| StorageError::Io {
            name: name.to_string(),
            source: e,
        })
    }

    fn exists(&self, name: &str) -> bool {
        self.resolve(name).map(|p| p.is_file()).unwrap_or(false)
    }
}

/// In-memory documents. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for seeding inputs.
    pub fn with(self, name: &str, data: impl Into<Vec<u8>>) -> Self {
        self.insert(name, data);
        self
    }

    pub fn insert(&self, name: &str, data: impl Into<Vec<u8>>) {
        self.lock().insert(name.to_string(), data.into());
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.lock().get(name).cloned()
    }

    /// Contents of a document as text, if present and valid UTF-8.
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(|bytes| String::from_utf8(bytes).ok())
    }

    pub fn names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        // a poisoned map is still a consistent map
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn read(&self, name: &str) -> StorageResult<Vec<u8>> {
        validate_name(name)?;
        self.get(name)
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    fn write(&self, name: &str, data: &[u8]) -> StorageResult<()> {
        validate_name(name)?;
        self.insert(name, data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_path_names() {
        let storage = MemoryStorage::new();
        for name in ["../etc/passwd", "a/b.txt", "a\\b.txt", "..", ".", ""] {
            assert!(matches!(
                storage.write(name, b"x"),
                Err(StorageError::InvalidName(_))
            ));
        }
    }

    #[test]
    fn test_memory_clones_share_contents() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.write("a.txt", b"hola").unwrap();
        assert_eq!(other.text("a.txt").as_deref(), Some("hola"));
        assert!(matches!(other.read("b.txt"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_local_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage.write("nota.txt", "día".as_bytes()).unwrap();
        assert_eq!(storage.read("nota.txt").unwrap(), "día".as_bytes());
        assert!(storage.exists("nota.txt"));
        assert!(matches!(
            storage.read("otra.txt"),
            Err(StorageError::NotFound(_))
        ));
    }
}
