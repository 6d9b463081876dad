use core::str::FromStr;
use serde::{Deserialize, Serialize};

use shopdesk_core::{ClientId, DomainError};

use crate::{Claims, Role};

/// Identity of an authenticated principal, as numbered by the backend.
///
/// For client principals this is the same number as their [`ClientId`], which
/// is what makes "edit own record" and "my orders only" checks possible.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(i64);

impl PrincipalId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for PrincipalId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<ClientId> for PrincipalId {
    fn from(value: ClientId) -> Self {
        Self(value.get())
    }
}

impl From<PrincipalId> for ClientId {
    fn from(value: PrincipalId) -> Self {
        ClientId::new(value.0)
    }
}

impl FromStr for PrincipalId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: ClientId = s.parse()?;
        Ok(id.into())
    }
}

/// Locally resolved identity: who is logged in and with which role.
///
/// Anonymous callers have no `Principal` at all (`Option::None` at the API
/// surface). The id may be absent when the credential carries neither `sub`
/// nor `id_client`; such a principal owns nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Option<PrincipalId>,
    pub role: Role,
}

impl Principal {
    /// Map decoded claims to a principal: `sub`, falling back to `id_client`.
    pub fn from_claims(claims: &Claims) -> Self {
        let id = claims
            .subject_id()
            .or_else(|| claims.client_id())
            .map(PrincipalId::new);

        Self {
            id,
            role: Role::from_permission_id(claims.permission_id()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// True iff this principal's id is `owner`.
    pub fn is_owner(&self, owner: PrincipalId) -> bool {
        self.id == Some(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;
    use crate::test_support::credential;
    use serde_json::json;

    fn principal(value: serde_json::Value) -> Principal {
        Principal::from_claims(&decode(&credential(value)).unwrap())
    }

    #[test]
    fn subject_id_takes_precedence_over_client_id() {
        let p = principal(json!({ "sub": 7, "id_client": 42 }));
        assert_eq!(p.id, Some(PrincipalId::new(7)));
    }

    #[test]
    fn falls_back_to_client_id() {
        let p = principal(json!({ "id_client": 42, "permission_id": 2 }));
        assert_eq!(p.id, Some(PrincipalId::new(42)));
        assert_eq!(p.role, Role::Client);
        assert!(p.is_owner(PrincipalId::new(42)));
        assert!(!p.is_owner(PrincipalId::new(43)));
    }

    #[test]
    fn principal_without_any_id_owns_nothing() {
        let p = principal(json!({ "permission_id": 1, "email": "root@example.com" }));
        assert_eq!(p.id, None);
        assert!(p.is_admin());
        assert!(!p.is_owner(PrincipalId::new(1)));
    }

    #[test]
    fn principal_id_parses_like_a_client_id() {
        assert_eq!("42".parse::<PrincipalId>().unwrap(), PrincipalId::new(42));
        assert!("zero".parse::<PrincipalId>().is_err());
        assert_eq!(ClientId::from(PrincipalId::new(5)), ClientId::new(5));
    }
}
