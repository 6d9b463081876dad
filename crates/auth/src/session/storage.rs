use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session storage document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("session storage lock poisoned")]
    LockPoisoned,
}

/// Key/value slot storage backing a [`super::SessionStore`].
///
/// The session layer only ever touches one key, but backends are plain
/// string maps so the same file or browser-style store can hold other
/// client-side settings.
pub trait CredentialStorage: Send + Sync + core::fmt::Debug {
    fn read(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Overwrites any previous value under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// Process-local storage.
///
/// Intended for tests and ephemeral sessions; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SessionError> {
        let slots = self.slots.read().map_err(|_| SessionError::LockPoisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut slots = self.slots.write().map_err(|_| SessionError::LockPoisoned)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut slots = self.slots.write().map_err(|_| SessionError::LockPoisoned)?;
        slots.remove(key);
        Ok(())
    }
}
