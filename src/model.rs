use serde::{Deserialize, Serialize};

/// The kinds of clickstream events the shop front end emits.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    View,
    AddToCart,
    Transaction,
}

/// One clickstream record. `transaction_id` is only set on purchase events;
/// a purchase is identified by `(visitor_id, transaction_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Event {
    pub visitor_id: u64,
    pub event: EventKind,
    pub item_id: u64,
    pub transaction_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub category_id: Option<u64>,
    pub brand_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Brand {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Client {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
}

/// Snapshot of the five tables, loaded once per run and held read-only.
#[derive(Debug, Default)]
pub struct Dataset {
    pub events: Vec<Event>,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
    pub clients: Vec<Client>,
}

/// One row of the product ranking. `name` stays empty when the purchased
/// item has no matching product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSales {
    pub item_id: u64,
    pub name: Option<String>,
    pub purchases: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandSales {
    pub brand: String,
    pub purchases: u64,
}

/// One row of the client ranking. The name fields stay empty for visitors
/// without a client record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientPurchases {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub purchases: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventTally {
    pub event: EventKind,
    pub count: u64,
}
