//! Auth context for one running client.
//!
//! Built once at start-up around the session slot and passed to whatever
//! needs to know who is logged in. Login and logout are its only writers.

use shopdesk_auth::{
    FileStorage, IdentityResolver, Navigator, PermissionEngine, RouteGuard, SessionStore, View,
    decode,
};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::login::LoginResponse;

#[derive(Debug, Clone)]
pub struct AppContext {
    session: SessionStore,
    identity: IdentityResolver,
    permissions: PermissionEngine,
    guard: RouteGuard,
}

impl AppContext {
    pub fn new(session: SessionStore) -> Self {
        let identity = IdentityResolver::new(session.clone());
        Self {
            permissions: PermissionEngine::new(identity.clone()),
            guard: RouteGuard::new(identity.clone()),
            identity,
            session,
        }
    }

    /// Attach to the persisted session configured in `config`.
    pub fn init(config: &ClientConfig) -> Self {
        tracing::debug!(path = %config.session_file.display(), "opening session file");
        Self::new(SessionStore::init(FileStorage::new(&config.session_file)))
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    pub fn permissions(&self) -> &PermissionEngine {
        &self.permissions
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Store the issued credential and pick the first view to show.
    ///
    /// A credential that doesn't decode is still stored (the backend decides
    /// what it is worth); locally it resolves as a non-admin.
    pub fn complete_login(&self, response: &LoginResponse) -> Result<View, ClientError> {
        let token = response.token()?;
        if let Err(e) = decode(token) {
            tracing::warn!(error = %e, "issued credential does not decode locally");
        }

        self.session.save(token)?;
        let landing = self.guard.landing_view();
        tracing::info!(landing = %landing, admin = self.identity.is_admin(), "logged in");
        Ok(landing)
    }

    pub fn logout(&self, navigator: &mut dyn Navigator) -> Result<(), ClientError> {
        self.session.teardown()?;
        navigator.navigate(View::Login);
        Ok(())
    }

    /// Guarded navigation: go to `view` if allowed, otherwise to wherever the
    /// guard redirects.
    pub fn navigate(&self, view: View, navigator: &mut dyn Navigator) -> bool {
        if self.guard.can_activate(view, navigator) {
            navigator.navigate(view);
            true
        } else {
            false
        }
    }
}
