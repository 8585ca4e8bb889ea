//! Catalog price, synced from Stripe.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dandeline_core::{PriceId, PriceType, ProductId};

use super::Product;

/// A price attached to a product.
///
/// At most one price per product carries `is_current = true`; the flag is
/// maintained by application logic, not a database constraint.
#[derive(Debug, Clone, Serialize)]
pub struct Price {
    pub id: PriceId,
    pub stripe_price_id: String,
    pub product_id: ProductId,
    pub active: bool,
    pub is_current: bool,
    pub currency: String,
    pub price_type: PriceType,
    /// Amount in currency units (e.g., 19.99).
    pub unit_amount: Decimal,
    /// Amount in the smallest currency unit (e.g., 1999 cents).
    pub unit_amount_minor: Option<i64>,
    pub billing_scheme: Option<String>,
    /// Recurring descriptor (interval, interval_count, usage_type) as
    /// reported upstream; `None` for one-time prices.
    pub recurring: Option<serde_json::Value>,
    pub nickname: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub stripe_created_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Box<Product>>,
}

/// Eager-loadable relations of a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceRelation {
    Product,
}

/// Input for creating a price.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPrice {
    pub stripe_price_id: String,
    pub product_id: ProductId,
    pub active: bool,
    #[serde(default)]
    pub is_current: bool,
    pub currency: String,
    pub price_type: PriceType,
    pub unit_amount: Decimal,
    #[serde(default)]
    pub unit_amount_minor: Option<i64>,
    #[serde(default)]
    pub billing_scheme: Option<String>,
    #[serde(default)]
    pub recurring: Option<serde_json::Value>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub stripe_created_at: Option<DateTime<Utc>>,
}

/// Partial update of a price. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePrice {
    pub active: Option<bool>,
    pub is_current: Option<bool>,
    pub currency: Option<String>,
    pub price_type: Option<PriceType>,
    pub unit_amount: Option<Decimal>,
    pub unit_amount_minor: Option<i64>,
    pub billing_scheme: Option<String>,
    pub recurring: Option<serde_json::Value>,
    pub nickname: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub stripe_created_at: Option<DateTime<Utc>>,
}
