//! `shopdesk-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the auth layer and
//! the resource collaborators (no storage, no transport).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, find_by_id};
pub use error::DomainError;
pub use id::{ClientId, OrderId, OrderItemId, ProductId};
