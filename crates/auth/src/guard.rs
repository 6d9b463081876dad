//! Navigation guard.
//!
//! Before a protected view opens, the guard runs up to two checks, always in
//! this order:
//!
//! 1. session: is a credential stored? If not, go to the login view.
//! 2. role (admin-only views): is the principal an admin? If not, go to the
//!    default view, which every logged-in principal may see.
//!
//! A denial aborts the navigation before the target view loads anything.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::IdentityResolver;

/// Views of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    Clients,
    Products,
    Orders,
}

impl View {
    pub const ALL: [View; 4] = [View::Login, View::Clients, View::Products, View::Orders];

    pub fn path(&self) -> &'static str {
        match self {
            View::Login => "login",
            View::Clients => "clients",
            View::Products => "products",
            View::Orders => "orders",
        }
    }

    /// Route table lookup. The empty path redirects to login; unknown paths
    /// have no view.
    pub fn from_path(path: &str) -> Option<View> {
        let path = path.trim().trim_matches('/');
        if path.is_empty() {
            return Some(View::Login);
        }
        View::ALL.into_iter().find(|v| v.path() == path)
    }

    pub fn requirements(&self) -> RouteRequirements {
        match self {
            View::Login => RouteRequirements::PUBLIC,
            View::Clients => RouteRequirements::ADMIN,
            View::Products | View::Orders => RouteRequirements::AUTHENTICATED,
        }
    }
}

impl core::fmt::Display for View {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "/{}", self.path())
    }
}

/// Which checks a route needs. Any combination is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RouteRequirements {
    pub session: bool,
    pub admin: bool,
}

impl RouteRequirements {
    pub const PUBLIC: Self = Self {
        session: false,
        admin: false,
    };
    pub const AUTHENTICATED: Self = Self {
        session: true,
        admin: false,
    };
    pub const ADMIN: Self = Self {
        session: true,
        admin: true,
    };
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardDenial {
    #[error("no active session")]
    NoSession,

    #[error("administrator role required")]
    InsufficientRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect { to: View, reason: GuardDenial },
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allow)
    }
}

/// Router collaborator that performs redirects.
pub trait Navigator {
    fn navigate(&mut self, to: View);
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    identity: IdentityResolver,
    login_view: View,
    default_view: View,
}

impl RouteGuard {
    pub fn new(identity: IdentityResolver) -> Self {
        Self {
            identity,
            login_view: View::Login,
            default_view: View::Products,
        }
    }

    /// Override where denied navigations are sent.
    pub fn with_redirects(mut self, login_view: View, default_view: View) -> Self {
        self.login_view = login_view;
        self.default_view = default_view;
        self
    }

    pub fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    /// Run the checks `requirements` asks for, session first.
    pub fn evaluate(&self, requirements: RouteRequirements) -> GuardOutcome {
        if requirements.session && !self.identity.has_session() {
            return GuardOutcome::Redirect {
                to: self.login_view,
                reason: GuardDenial::NoSession,
            };
        }

        if requirements.admin && !self.identity.is_admin() {
            return GuardOutcome::Redirect {
                to: self.default_view,
                reason: GuardDenial::InsufficientRole,
            };
        }

        GuardOutcome::Allow
    }

    pub fn check_view(&self, view: View) -> GuardOutcome {
        self.evaluate(view.requirements())
    }

    /// Decide a navigation to `view`; on denial, issue the one redirect.
    pub fn can_activate(&self, view: View, navigator: &mut dyn Navigator) -> bool {
        match self.check_view(view) {
            GuardOutcome::Allow => true,
            GuardOutcome::Redirect { to, reason } => {
                tracing::info!(target_view = %view, redirect = %to, %reason, "navigation denied");
                navigator.navigate(to);
                false
            }
        }
    }

    /// Where to send a principal right after login.
    pub fn landing_view(&self) -> View {
        if self.identity.is_admin() {
            View::Clients
        } else {
            self.default_view
        }
    }
}
