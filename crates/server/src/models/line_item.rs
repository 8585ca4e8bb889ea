//! Order line item.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dandeline_core::{LineItemId, OrderId, ProductId};

/// An immutable snapshot of one purchased product on an order.
///
/// Product fields are copied at purchase time so the order keeps showing
/// exactly what the customer bought, even if the product is later edited
/// or deleted. `product_id` is `None` when no local product matched the
/// purchased Stripe product.
#[derive(Debug, Clone, Serialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub product_sku: Option<String>,
    pub product_description: Option<String>,
    pub product_image_url: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub currency: String,
    pub stripe_price_id: Option<String>,
    pub stripe_product_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a line item. Line items are append-only; there is no
/// update record.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLineItem {
    pub order_id: OrderId,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub product_name: String,
    #[serde(default)]
    pub product_sku: Option<String>,
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(default)]
    pub product_image_url: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub currency: String,
    #[serde(default)]
    pub stripe_price_id: Option<String>,
    #[serde(default)]
    pub stripe_product_id: Option<String>,
}
