//! User actions and the permission check action handlers run first.

use std::time::Duration;

use shopdesk_auth::authorize::authorize_action;
use shopdesk_auth::{
    Action, Permission, PermissionEngine, PrincipalId, RequiresPermission, Resource,
};
use shopdesk_core::{ClientId, OrderId, ProductId};

/// How long a transient notification stays up.
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    CreateClient,
    EditClient(ClientId),
    DeleteClient(ClientId),
    CreateProduct,
    EditProduct(ProductId),
    DeleteProduct(ProductId),
    CreateOrder,
    /// Add lines to an existing order.
    AddOrderItems(OrderId),
    DeleteOrder(OrderId),
}

impl RequiresPermission for UserAction {
    fn required_permission(&self) -> Permission {
        let (resource, action) = match self {
            UserAction::CreateClient => (Resource::Client, Action::Create),
            UserAction::EditClient(_) => (Resource::Client, Action::Edit),
            UserAction::DeleteClient(_) => (Resource::Client, Action::Delete),
            UserAction::CreateProduct => (Resource::Product, Action::Create),
            UserAction::EditProduct(_) => (Resource::Product, Action::Edit),
            UserAction::DeleteProduct(_) => (Resource::Product, Action::Delete),
            UserAction::CreateOrder => (Resource::Order, Action::Create),
            UserAction::AddOrderItems(_) => (Resource::Order, Action::Edit),
            UserAction::DeleteOrder(_) => (Resource::Order, Action::Delete),
        };
        Permission::new(resource, action)
    }

    fn owner(&self) -> Option<PrincipalId> {
        match self {
            UserAction::EditClient(id) => Some((*id).into()),
            _ => None,
        }
    }
}

/// Dismissible message shown instead of performing a denied action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub duration: Duration,
}

impl Notification {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration: NOTIFICATION_DURATION,
        }
    }
}

/// Gate an action handler. On denial nothing has been mutated and the caller
/// shows the returned notification.
pub fn check_action(engine: &PermissionEngine, action: &UserAction) -> Result<(), Notification> {
    let principal = engine.identity().current_principal();
    authorize_action(principal.as_ref(), action).map_err(|e| Notification::transient(e.to_string()))
}
