//! Record shapes served by the resource services, and list normalization.
//!
//! Some endpoints answer a list request with a bare JSON array, others with an
//! envelope `{"data": [...]}`. [`normalize_list`] turns either into a plain
//! `Vec` before anything downstream (scoping, permission checks) sees it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use shopdesk_core::{ClientId, Entity, OrderId, OrderItemId, ProductId};

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id_client: ClientId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, rename = "razao_social", skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

impl Client {
    /// Company name, else email, else `Client #<id>`.
    pub fn display_name(&self) -> String {
        self.company_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(Some(self.email.as_str()).filter(|s| !s.is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Client #{}", self.id_client))
    }
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id_client
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id_product: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    pub fn preview_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id_product
    }
}

/// The owning client of an order: some endpoints embed the record, others
/// send only its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClientRef {
    Id(ClientId),
    Embedded(Client),
}

impl ClientRef {
    pub fn client_id(&self) -> ClientId {
        match self {
            ClientRef::Id(id) => *id,
            ClientRef::Embedded(client) => client.id_client,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            ClientRef::Id(id) => format!("Client #{id}"),
            ClientRef::Embedded(client) => client.display_name(),
        }
    }
}

/// A line of an order as embedded in the order payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id_order_item: OrderItemId,
    /// Quantity of the product on this line.
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_items: f64,
    pub product: Product,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id_order: OrderId,
    /// Order total.
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_items: f64,
    pub id_client: ClientRef,
    #[serde(default, rename = "orderItems")]
    pub order_items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id_order
    }
}

/// A new order line as sent to the order service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub id_product: ProductId,
    pub quantity: u32,
    pub price: f64,
}

/// Body of an order-creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub id_client: ClientId,
    pub total_items: f64,
    #[serde(rename = "orderItems")]
    pub order_items: Vec<NewOrderItem>,
}

impl NewOrder {
    /// Order for `owner`; the total is the sum of `price * quantity`.
    pub fn new(owner: ClientId, items: Vec<NewOrderItem>) -> Self {
        let total_items = items.iter().map(|i| i.price * f64::from(i.quantity)).sum();
        Self {
            id_client: owner,
            total_items,
            order_items: items,
        }
    }
}

/// Normalize a list response: a bare array, or `{"data": [...]}`.
///
/// Any other shape (missing or non-array `data`, scalars, `null`) is an empty
/// list. Elements that don't match `T` are an error.
pub fn normalize_list<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, ClientError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(ClientError::from))
        .collect()
}

/// Numbers that the backend sometimes serializes as strings (`"19.90"`).
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(f64),
        Str(String),
    }

    match Option::<NumOrString>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(NumOrString::Num(v)) => Ok(v),
        Some(NumOrString::Str(s)) => {
            let expected = || format!("expected a number, found {s:?}");
            s.trim()
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(expected()))
        }
    }
}
