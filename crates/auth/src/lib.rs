//! `shopdesk-auth` — client-side session and authorization core.
//!
//! Who is logged in, with which role, and what they may do, decided locally
//! from the stored credential. This crate is decoupled from HTTP and UI.
//!
//! Claims are **advisory**: the credential's signature is never verified here,
//! so these decisions only shape what the UI offers. The backend re-checks
//! every mutation.

pub mod authorize;
pub mod claims;
pub mod codec;
pub mod guard;
pub mod identity;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod session;

pub use authorize::{
    AuthorizationExplanation, AuthzError, RequiresPermission, authorize, explain_authorization,
};
pub use claims::{Claims, TokenTimeError};
pub use codec::{DecodeError, decode};
pub use guard::{GuardDenial, GuardOutcome, Navigator, RouteGuard, RouteRequirements, View};
pub use identity::IdentityResolver;
pub use permissions::{Action, Permission, PermissionEngine, Resource};
pub use principal::{Principal, PrincipalId};
pub use roles::{ADMIN_PERMISSION_ID, Role};
pub use session::{CredentialStorage, FileStorage, MemoryStorage, SessionError, SessionStore};
