//! Who is logged in, derived from the stored credential on every call.
//!
//! Nothing is cached: each query re-reads the session slot and re-decodes the
//! credential, so login and logout are visible immediately without any
//! invalidation step.

use chrono::Utc;

use crate::claims::TokenTimeError;
use crate::codec;
use crate::session::SessionStore;
use crate::{Principal, PrincipalId};

#[derive(Debug, Clone)]
pub struct IdentityResolver {
    session: SessionStore,
}

impl IdentityResolver {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The current principal, or `None` for an anonymous caller.
    ///
    /// A stored credential that fails to decode is treated exactly like no
    /// credential.
    pub fn current_principal(&self) -> Option<Principal> {
        let credential = self.session.load()?;

        let claims = match codec::decode(&credential) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "stored credential did not decode");
                return None;
            }
        };

        // Expiry is the backend's call; only flag it here.
        if let Err(TokenTimeError::Expired) = claims.time_window(Utc::now()) {
            tracing::debug!("stored credential is past its exp claim");
        }

        Some(Principal::from_claims(&claims))
    }

    pub fn is_admin(&self) -> bool {
        self.current_principal().is_some_and(|p| p.is_admin())
    }

    /// True iff a credential is stored, whether or not it decodes.
    pub fn has_session(&self) -> bool {
        self.session.has_credential()
    }

    pub fn current_user_id(&self) -> Option<PrincipalId> {
        self.current_principal().and_then(|p| p.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use crate::test_support::credential;
    use proptest::prelude::*;
    use serde_json::json;

    fn resolver_with(token: Option<String>) -> IdentityResolver {
        let session = SessionStore::in_memory();
        if let Some(token) = token {
            session.save(&token).unwrap();
        }
        IdentityResolver::new(session)
    }

    #[test]
    fn no_credential_is_anonymous() {
        let resolver = resolver_with(None);
        assert_eq!(resolver.current_principal(), None);
        assert!(!resolver.is_admin());
        assert!(!resolver.has_session());
        assert_eq!(resolver.current_user_id(), None);
    }

    #[test]
    fn undecodable_credential_is_anonymous_but_still_a_session() {
        let resolver = resolver_with(Some("garbage".to_string()));
        assert_eq!(resolver.current_principal(), None);
        assert!(!resolver.is_admin());
        assert!(resolver.has_session());
    }

    #[test]
    fn permission_id_one_resolves_admin() {
        let resolver = resolver_with(Some(credential(json!({ "permission_id": 1, "sub": 3 }))));
        assert!(resolver.is_admin());
        assert_eq!(resolver.current_user_id(), Some(PrincipalId::new(3)));
    }

    #[test]
    fn missing_permission_id_resolves_client() {
        let resolver = resolver_with(Some(credential(json!({ "id_client": 8 }))));
        let principal = resolver.current_principal().unwrap();
        assert_eq!(principal.role, Role::Client);
        assert_eq!(principal.id, Some(PrincipalId::new(8)));
        assert!(!resolver.is_admin());
    }

    #[test]
    fn expired_credential_still_resolves() {
        let resolver = resolver_with(Some(credential(json!({
            "id_client": 8,
            "iat": 1_000,
            "exp": 2_000,
        }))));
        assert!(resolver.current_principal().is_some());
    }

    #[test]
    fn logout_is_seen_immediately() {
        let resolver = resolver_with(Some(credential(json!({ "permission_id": 1 }))));
        assert!(resolver.is_admin());

        resolver.session().clear().unwrap();
        assert_eq!(resolver.current_principal(), None);
        assert!(!resolver.is_admin());
    }

    #[test]
    fn login_as_someone_else_is_seen_immediately() {
        let resolver = resolver_with(Some(credential(json!({ "permission_id": 1, "sub": 1 }))));
        resolver
            .session()
            .save(&credential(json!({ "permission_id": 2, "id_client": 42 })))
            .unwrap();

        assert!(!resolver.is_admin());
        assert_eq!(resolver.current_user_id(), Some(PrincipalId::new(42)));
    }

    proptest! {
        /// Property: resolving twice without a session change gives the same answer.
        #[test]
        fn current_principal_is_idempotent(
            permission_id in proptest::option::of(-5i64..5),
            id_client in proptest::option::of(1i64..10_000),
        ) {
            let resolver = resolver_with(Some(credential(json!({
                "permission_id": permission_id,
                "id_client": id_client,
            }))));
            let first = resolver.current_principal();
            let second = resolver.current_principal();
            prop_assert!(first.is_some());
            prop_assert_eq!(first, second);
            prop_assert_eq!(resolver.is_admin(), permission_id == Some(1));
        }
    }
}
