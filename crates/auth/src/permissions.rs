use serde::{Deserialize, Serialize};

use crate::authorize::{self, AuthzError};
use crate::identity::IdentityResolver;
use crate::{Principal, PrincipalId};

/// Managed entity types of the business backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Client,
    Product,
    Order,
    OrderItem,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Client,
        Resource::Product,
        Resource::Order,
        Resource::OrderItem,
    ];

    /// Plural, lowercase name used in permission names and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Client => "clients",
            Resource::Product => "products",
            Resource::Order => "orders",
            Resource::OrderItem => "order_items",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Resource::OrderItem => "order items",
            other => other.as_str(),
        }
    }
}

impl core::str::FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" | "clients" => Ok(Resource::Client),
            "product" | "products" => Ok(Resource::Product),
            "order" | "orders" => Ok(Resource::Order),
            "order_item" | "order_items" | "order-item" | "order-items" => Ok(Resource::OrderItem),
            other => Err(format!("unknown resource '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// See a single record or one's own records.
    View,
    /// See every record of the type, not just one's own.
    ViewAll,
    Create,
    Edit,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::ViewAll => "view_all",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl core::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "view" => Ok(Action::View),
            "view_all" | "view-all" => Ok(Action::ViewAll),
            "create" => Ok(Action::Create),
            "edit" | "update" => Ok(Action::Edit),
            "delete" => Ok(Action::Delete),
            other => Err(format!("unknown action '{other}'")),
        }
    }
}

/// An action on a resource type, e.g. `orders.create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub resource: Resource,
    pub action: Action,
}

impl Permission {
    pub const fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    /// Human phrasing for notifications ("delete orders").
    pub fn describe(&self) -> String {
        let verb = match self.action {
            Action::View => "view",
            Action::ViewAll => "view all",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        };
        format!("{verb} {}", self.resource.label())
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.resource.as_str(), self.action.as_str())
    }
}

/// The policy rule a decision was made under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Product catalog viewing is public, anonymous callers included.
    PublicCatalog,
    /// No principal; everything but the catalog is denied.
    Anonymous,
    /// Admins are allowed everything.
    Administrator,
    /// Clients may view records; lists are narrowed where they are fetched.
    ClientView,
    /// Any logged-in client may place orders.
    ClientOrder,
    /// A client editing their own client record.
    OwnRecord,
    /// A client editing someone else's client record.
    ForeignRecord(PrincipalId),
    /// An own-record rule with no target record.
    NoTarget,
    /// Everything else is reserved to admins.
    AdminOnly,
}

impl Rule {
    pub fn granted(&self) -> bool {
        matches!(
            self,
            Rule::PublicCatalog
                | Rule::Administrator
                | Rule::ClientView
                | Rule::ClientOrder
                | Rule::OwnRecord
        )
    }
}

/// The business rules. Pure and total.
///
/// `owner` is only consulted for client-record edits; a missing owner denies.
pub fn evaluate(
    principal: Option<&Principal>,
    permission: Permission,
    owner: Option<PrincipalId>,
) -> Rule {
    if permission == Permission::new(Resource::Product, Action::View) {
        return Rule::PublicCatalog;
    }

    let Some(principal) = principal else {
        return Rule::Anonymous;
    };
    if principal.is_admin() {
        return Rule::Administrator;
    }

    match (permission.resource, permission.action) {
        (_, Action::View) => Rule::ClientView,
        (Resource::Order, Action::Create) => Rule::ClientOrder,
        (Resource::Client, Action::Edit) => match owner {
            Some(o) if principal.is_owner(o) => Rule::OwnRecord,
            Some(o) => Rule::ForeignRecord(o),
            None => Rule::NoTarget,
        },
        _ => Rule::AdminOnly,
    }
}

/// Whether [`evaluate`] grants `permission`.
pub fn allows(
    principal: Option<&Principal>,
    permission: Permission,
    owner: Option<PrincipalId>,
) -> bool {
    evaluate(principal, permission, owner).granted()
}

/// Permission queries against whoever is currently logged in.
///
/// Each query resolves the principal afresh through the [`IdentityResolver`].
#[derive(Debug, Clone)]
pub struct PermissionEngine {
    identity: IdentityResolver,
}

impl PermissionEngine {
    pub fn new(identity: IdentityResolver) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    pub fn allows(&self, permission: Permission, owner: Option<PrincipalId>) -> bool {
        let principal = self.identity.current_principal();
        allows(principal.as_ref(), permission, owner)
    }

    /// Like [`Self::allows`], but as a `Result` suitable for action handlers.
    pub fn authorize(
        &self,
        permission: Permission,
        owner: Option<PrincipalId>,
    ) -> Result<(), AuthzError> {
        let principal = self.identity.current_principal();
        authorize::authorize(principal.as_ref(), permission, owner)
    }

    pub fn can_view_all(&self, resource: Resource) -> bool {
        self.allows(Permission::new(resource, Action::ViewAll), None)
    }

    pub fn can_create(&self, resource: Resource) -> bool {
        self.allows(Permission::new(resource, Action::Create), None)
    }

    pub fn can_edit(&self, resource: Resource, owner: Option<PrincipalId>) -> bool {
        self.allows(Permission::new(resource, Action::Edit), owner)
    }

    pub fn can_delete(&self, resource: Resource) -> bool {
        self.allows(Permission::new(resource, Action::Delete), None)
    }

    pub fn can_view_all_clients(&self) -> bool {
        self.can_view_all(Resource::Client)
    }

    pub fn can_create_client(&self) -> bool {
        self.can_create(Resource::Client)
    }

    pub fn can_edit_client(&self, owner: impl Into<PrincipalId>) -> bool {
        self.can_edit(Resource::Client, Some(owner.into()))
    }

    pub fn can_delete_client(&self) -> bool {
        self.can_delete(Resource::Client)
    }

    /// Catalog visibility for the UI; the products view itself is still guarded.
    pub fn can_view_products(&self) -> bool {
        self.allows(Permission::new(Resource::Product, Action::View), None)
    }

    pub fn can_create_order(&self) -> bool {
        self.can_create(Resource::Order)
    }

    pub fn can_delete_product(&self) -> bool {
        self.can_delete(Resource::Product)
    }

    pub fn can_delete_order(&self) -> bool {
        self.can_delete(Resource::Order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use crate::session::SessionStore;
    use crate::test_support::credential;
    use serde_json::json;

    fn engine_with(claims: Option<serde_json::Value>) -> PermissionEngine {
        let session = SessionStore::in_memory();
        if let Some(claims) = claims {
            session.save(&credential(claims)).unwrap();
        }
        PermissionEngine::new(IdentityResolver::new(session))
    }

    fn client(id: i64) -> Principal {
        Principal {
            id: Some(PrincipalId::new(id)),
            role: Role::Client,
        }
    }

    #[test]
    fn admin_may_do_everything() {
        let engine = engine_with(Some(json!({ "permission_id": 1 })));
        for resource in Resource::ALL {
            assert!(engine.can_view_all(resource));
            assert!(engine.can_create(resource));
            assert!(engine.can_edit(resource, None));
            assert!(engine.can_delete(resource));
        }
        assert!(engine.can_edit_client(PrincipalId::new(99)));
    }

    #[test]
    fn client_edits_only_own_record() {
        let engine = engine_with(Some(json!({ "permission_id": 2, "id_client": 42 })));
        assert!(engine.can_edit_client(PrincipalId::new(42)));
        assert!(!engine.can_edit_client(PrincipalId::new(43)));
        assert!(!engine.can_delete_client());
        assert!(!engine.can_view_all_clients());
        assert!(!engine.can_create_client());
    }

    #[test]
    fn client_without_permission_id_may_still_order() {
        let engine = engine_with(Some(json!({ "id_client": 5 })));
        assert!(!engine.identity().is_admin());
        assert!(engine.can_create_order());
        assert!(!engine.can_delete_order());
        assert!(!engine.can_delete_product());
        assert!(!engine.can_create(Resource::Product));
    }

    #[test]
    fn anonymous_is_denied_all_but_catalog() {
        let engine = engine_with(None);
        assert!(engine.can_view_products());
        assert!(!engine.can_create_order());
        assert!(!engine.can_edit_client(PrincipalId::new(1)));
        for resource in Resource::ALL {
            assert!(!engine.can_view_all(resource));
            assert!(!engine.can_delete(resource));
        }
    }

    #[test]
    fn undecodable_credential_is_denied_like_anonymous() {
        let session = SessionStore::in_memory();
        session.save("not.a-valid.credential").unwrap();
        let engine = PermissionEngine::new(IdentityResolver::new(session));
        assert!(engine.can_view_products());
        assert!(!engine.can_create_order());
    }

    #[test]
    fn client_edit_of_other_resources_is_denied_even_with_owner() {
        let me = client(42);
        let owner = Some(PrincipalId::new(42));
        let edit_order = Permission::new(Resource::Order, Action::Edit);
        let edit_product = Permission::new(Resource::Product, Action::Edit);
        assert!(!allows(Some(&me), edit_order, owner));
        assert!(!allows(Some(&me), edit_product, owner));
    }

    #[test]
    fn client_edit_without_owner_is_denied() {
        let me = client(42);
        let edit = Permission::new(Resource::Client, Action::Edit);
        assert!(!allows(Some(&me), edit, None));
    }

    #[test]
    fn principal_without_id_owns_nothing() {
        let nobody = Principal {
            id: None,
            role: Role::Client,
        };
        let edit = Permission::new(Resource::Client, Action::Edit);
        let order = Permission::new(Resource::Order, Action::Create);
        assert!(!allows(Some(&nobody), edit, Some(PrincipalId::new(1))));
        assert!(allows(Some(&nobody), order, None));
    }

    #[test]
    fn rules_name_the_decision() {
        let edit = Permission::new(Resource::Client, Action::Edit);
        let me = client(42);
        let mine = Some(PrincipalId::new(42));
        assert_eq!(evaluate(Some(&me), edit, mine), Rule::OwnRecord);
        assert_eq!(
            evaluate(Some(&me), edit, Some(PrincipalId::new(7))),
            Rule::ForeignRecord(PrincipalId::new(7))
        );
        assert_eq!(evaluate(Some(&me), edit, None), Rule::NoTarget);
        assert_eq!(evaluate(None, edit, None), Rule::Anonymous);
    }

    #[test]
    fn permission_names_and_parsing() {
        let p = Permission::new(Resource::OrderItem, Action::ViewAll);
        assert_eq!(p.to_string(), "order_items.view_all");
        assert_eq!(p.describe(), "view all order items");
        assert_eq!("orders".parse::<Resource>().unwrap(), Resource::Order);
        assert_eq!("update".parse::<Action>().unwrap(), Action::Edit);
        assert!("invoices".parse::<Resource>().is_err());
    }
}
