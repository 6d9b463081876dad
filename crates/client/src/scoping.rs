//! "My records only" filtering and ownership decisions at the list boundary.
//!
//! The resource services return everything the backend lets through; the UI
//! narrows lists for non-admins here, using the locally resolved principal.

use shopdesk_auth::permissions::allows;
use shopdesk_auth::{Action, AuthzError, Permission, Principal, PrincipalId, Resource};
use shopdesk_core::ClientId;

use crate::error::ClientError;
use crate::resources::{Client, Order};

/// Records that belong to a client.
pub trait Owned {
    fn owner(&self) -> ClientId;
}

impl Owned for Client {
    fn owner(&self) -> ClientId {
        self.id_client
    }
}

impl Owned for Order {
    fn owner(&self) -> ClientId {
        self.id_client.client_id()
    }
}

/// Keep what `principal` may list: everything for an admin, own records for a
/// client, nothing for an anonymous caller.
pub fn scope_to_principal<T: Owned>(records: Vec<T>, principal: Option<&Principal>) -> Vec<T> {
    match principal {
        None => Vec::new(),
        Some(p) if p.is_admin() => records,
        Some(p) => records
            .into_iter()
            .filter(|r| p.is_owner(PrincipalId::from(r.owner())))
            .collect(),
    }
}

/// How the order dialog opens for the current principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDialogMode {
    /// Fresh order.
    Create,
    /// Existing order; new lines may be added.
    AddItems,
    /// Existing order, read-only.
    ViewOnly,
}

/// `None` when the principal may not open the dialog at all.
pub fn order_dialog_mode(
    principal: Option<&Principal>,
    existing: bool,
) -> Option<OrderDialogMode> {
    let order = |action| Permission::new(Resource::Order, action);

    if !existing {
        let create = allows(principal, order(Action::Create), None);
        return create.then_some(OrderDialogMode::Create);
    }

    if allows(principal, order(Action::Edit), None) {
        Some(OrderDialogMode::AddItems)
    } else if allows(principal, order(Action::View), None) {
        Some(OrderDialogMode::ViewOnly)
    } else {
        None
    }
}

/// Whose a new order is.
///
/// Admins order on behalf of a client and must pick one. Clients always order
/// for themselves; whatever was selected is ignored.
pub fn new_order_owner(
    principal: Option<&Principal>,
    selected: Option<ClientId>,
) -> Result<ClientId, ClientError> {
    let create = Permission::new(Resource::Order, Action::Create);
    let Some(principal) = principal.filter(|p| allows(Some(*p), create, None)) else {
        return Err(AuthzError::PermissionDenied(create).into());
    };

    if principal.is_admin() {
        return selected.ok_or(ClientError::OwnerRequired);
    }

    principal
        .id
        .map(ClientId::from)
        .ok_or(ClientError::UnidentifiedClient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shopdesk_auth::Role;

    fn admin() -> Principal {
        Principal {
            id: Some(PrincipalId::new(1)),
            role: Role::Admin,
        }
    }

    fn client(id: i64) -> Principal {
        Principal {
            id: Some(PrincipalId::new(id)),
            role: Role::Client,
        }
    }

    fn nobody() -> Principal {
        Principal {
            id: None,
            role: Role::Client,
        }
    }

    fn orders() -> Vec<Order> {
        serde_json::from_value(json!([
            { "id_order": 1, "total_items": 10, "id_client": 42 },
            { "id_order": 2, "total_items": 11, "id_client": { "id_client": 43 } },
            {
                "id_order": 3,
                "total_items": 12,
                "id_client": { "id_client": 42, "email": "me@example.com" }
            },
        ]))
        .unwrap()
    }

    #[test]
    fn admin_sees_every_order() {
        assert_eq!(scope_to_principal(orders(), Some(&admin())).len(), 3);
    }

    #[test]
    fn client_sees_only_own_orders() {
        let mine = scope_to_principal(orders(), Some(&client(42)));
        let ids: Vec<i64> = mine.iter().map(|o| o.id_order.get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn anonymous_and_id_less_principals_see_nothing() {
        assert!(scope_to_principal(orders(), None).is_empty());
        assert!(scope_to_principal(orders(), Some(&nobody())).is_empty());
    }

    #[test]
    fn dialog_modes() {
        use OrderDialogMode::{AddItems, Create, ViewOnly};

        assert_eq!(order_dialog_mode(Some(&admin()), true), Some(AddItems));
        assert_eq!(order_dialog_mode(Some(&client(4)), true), Some(ViewOnly));
        assert_eq!(order_dialog_mode(Some(&client(4)), false), Some(Create));
        assert_eq!(order_dialog_mode(None, false), None);
        assert_eq!(order_dialog_mode(None, true), None);
    }

    #[test]
    fn admin_must_choose_owner() {
        let admin = admin();
        assert!(matches!(
            new_order_owner(Some(&admin), None),
            Err(ClientError::OwnerRequired)
        ));

        let owner = new_order_owner(Some(&admin), Some(ClientId::new(9))).unwrap();
        assert_eq!(owner, ClientId::new(9));
    }

    #[test]
    fn client_orders_for_self() {
        let me = client(42);
        let owner = new_order_owner(Some(&me), Some(ClientId::new(9))).unwrap();
        assert_eq!(owner, ClientId::new(42));
        assert_eq!(new_order_owner(Some(&me), None).unwrap(), ClientId::new(42));

        assert!(matches!(
            new_order_owner(Some(&nobody()), None),
            Err(ClientError::UnidentifiedClient)
        ));
    }

    #[test]
    fn anonymous_cannot_order() {
        assert!(matches!(
            new_order_owner(None, Some(ClientId::new(1))),
            Err(ClientError::Forbidden(_))
        ));
    }
}
