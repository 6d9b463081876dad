//! Single-slot session persistence.
//!
//! The session is one credential string stored under [`CREDENTIAL_KEY`]. There
//! is no process-wide singleton: the application builds a [`SessionStore`] at
//! start-up and hands it to whatever needs to know who is logged in.

pub mod file;
pub mod storage;

use std::sync::Arc;

pub use file::FileStorage;
pub use storage::{CredentialStorage, MemoryStorage, SessionError};

/// Storage key of the credential slot.
pub const CREDENTIAL_KEY: &str = "access_token";

/// Handle on the current credential slot.
///
/// Cloning the handle shares the slot. Writes come from sequential
/// user-initiated events (login, logout), so the last writer wins and no
/// further coordination is needed.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<dyn CredentialStorage>,
}

impl SessionStore {
    pub fn new(storage: impl CredentialStorage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// Ephemeral session backed by [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Application start-up: attach to `storage` and report whether a
    /// credential from a previous run is present.
    pub fn init(storage: impl CredentialStorage + 'static) -> Self {
        let store = Self::new(storage);
        if store.load().is_some() {
            tracing::info!("restored persisted session");
        } else {
            tracing::debug!("no persisted session");
        }
        store
    }

    /// Persist `credential`, replacing any previous one.
    pub fn save(&self, credential: &str) -> Result<(), SessionError> {
        self.storage.write(CREDENTIAL_KEY, credential)?;
        tracing::debug!("session credential saved");
        Ok(())
    }

    /// Current credential, if any, exactly as stored.
    ///
    /// Only an empty string reads as no session; a blank credential is still
    /// a session and fails later, at decode. A storage failure is logged and
    /// reads as no session, so callers always get a definite answer.
    pub fn load(&self) -> Option<String> {
        match self.storage.read(CREDENTIAL_KEY) {
            Ok(Some(credential)) if !credential.is_empty() => Some(credential),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session credential");
                None
            }
        }
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        self.storage.remove(CREDENTIAL_KEY)?;
        tracing::debug!("session credential cleared");
        Ok(())
    }

    /// Logout: drop the stored credential.
    pub fn teardown(&self) -> Result<(), SessionError> {
        self.clear()?;
        tracing::info!("session ended");
        Ok(())
    }

    pub fn has_credential(&self) -> bool {
        self.load().is_some()
    }
}
