//! `shopdesk-client`
//!
//! **Responsibility:** the client-side boundary between the auth core and the
//! backend's resource services.
//!
//! This crate provides:
//! - The auth context (session slot, identity, permissions, guard) and the
//!   login/logout flow
//! - Record shapes and list-envelope normalization
//! - "My records only" scoping and order ownership rules
//! - Permission gating of user actions
//!
//! HTTP transport and rendering stay with the caller.

pub mod actions;
pub mod app;
pub mod config;
pub mod error;
pub mod login;
pub mod resources;
pub mod scoping;

pub use actions::{Notification, UserAction, check_action};
pub use app::AppContext;
pub use config::ClientConfig;
pub use error::ClientError;
pub use login::{LoginRequest, LoginResponse};
pub use resources::{
    Client, ClientRef, NewOrder, NewOrderItem, Order, OrderItem, Product, normalize_list,
};
pub use scoping::{OrderDialogMode, Owned, new_order_owner, order_dialog_mode, scope_to_principal};
