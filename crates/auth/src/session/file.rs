use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::storage::{CredentialStorage, SessionError};

/// Durable storage: a small JSON object (`{"key": "value", ...}`) on disk.
///
/// The file path plays the role of the storage origin; two handles on the same
/// path share the slot. Every write rewrites the whole document through a
/// temp file in the same directory, persisted over the target.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_document(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    /// Document to mutate; an unreadable document is replaced rather than
    /// blocking every future login.
    fn load_for_update(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match self.load_document() {
            Err(SessionError::Corrupt(e)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "replacing corrupt session file"
                );
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn store_document(&self, doc: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // An unpersisted temp file is deleted on drop.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&serde_json::to_vec_pretty(doc)?)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl CredentialStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.load_document()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut doc = self.load_for_update()?;
        doc.insert(key.to_string(), value.to_string());
        self.store_document(&doc)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut doc = self.load_for_update()?;
        if doc.remove(key).is_none() {
            return Ok(());
        }
        self.store_document(&doc)
    }
}
