use serde::{Deserialize, Serialize};

/// `permission_id` value the issuer assigns to administrators.
pub const ADMIN_PERMISSION_ID: i64 = 1;

/// Role of a resolved principal.
///
/// The credential carries a numeric `permission_id`; only
/// [`ADMIN_PERMISSION_ID`] is meaningful, everything else is a regular client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Client,
}

impl Role {
    pub fn from_permission_id(permission_id: Option<i64>) -> Self {
        match permission_id {
            Some(ADMIN_PERMISSION_ID) => Role::Admin,
            _ => Role::Client,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Client => "client",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
