use serde::Serialize;
use thiserror::Error;

use crate::permissions::{self, Permission, Rule};
use crate::{Principal, PrincipalId};

/// A permission check that failed inside an action handler.
///
/// The `Display` text is what the UI shows in its transient notification; the
/// handler returns before touching any state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    #[error("you do not have permission to {}", .0.describe())]
    PermissionDenied(Permission),
}

/// Action-side authorization contract.
///
/// Implement this on user actions (delete order, edit client, ...) so the
/// handler can check them uniformly before doing any work.
pub trait RequiresPermission {
    fn required_permission(&self) -> Permission;

    /// Owner of the targeted record, for own-record rules.
    fn owner(&self) -> Option<PrincipalId> {
        None
    }
}

/// Check `permission` for `principal` (`None` = anonymous).
///
/// - No IO
/// - No panics
pub fn authorize(
    principal: Option<&Principal>,
    permission: Permission,
    owner: Option<PrincipalId>,
) -> Result<(), AuthzError> {
    if permissions::allows(principal, permission, owner) {
        Ok(())
    } else {
        tracing::info!(%permission, "permission denied");
        Err(AuthzError::PermissionDenied(permission))
    }
}

/// [`authorize`] for an action that declares its own requirement.
pub fn authorize_action<A: RequiresPermission>(
    principal: Option<&Principal>,
    action: &A,
) -> Result<(), AuthzError> {
    authorize(principal, action.required_permission(), action.owner())
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation
// ─────────────────────────────────────────────────────────────────────────────

/// Why a decision came out the way it did (for debugging and the CLI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationExplanation {
    pub permission: String,
    pub granted: bool,
    pub principal: Option<Principal>,
    pub owner: Option<PrincipalId>,
    pub reason: String,
}

pub fn explain_authorization(
    principal: Option<&Principal>,
    permission: Permission,
    owner: Option<PrincipalId>,
) -> AuthorizationExplanation {
    let rule = permissions::evaluate(principal, permission, owner);

    let reason = match rule {
        Rule::PublicCatalog => "the product catalog is visible to everyone".to_string(),
        Rule::Anonymous => "no valid session; anonymous callers are denied".to_string(),
        Rule::Administrator => "administrators are allowed every action".to_string(),
        Rule::ClientView => "clients may view their own records".to_string(),
        Rule::ClientOrder => "any logged-in client may place orders".to_string(),
        Rule::OwnRecord => "clients may edit their own record".to_string(),
        Rule::ForeignRecord(o) => format!("client record {o} belongs to someone else"),
        Rule::NoTarget => "no target record given for an own-record rule".to_string(),
        Rule::AdminOnly => format!("only administrators may {}", permission.describe()),
    };

    AuthorizationExplanation {
        permission: permission.to_string(),
        granted: rule.granted(),
        principal: principal.copied(),
        owner,
        reason,
    }
}
