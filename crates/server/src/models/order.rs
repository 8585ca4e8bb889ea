//! Customer order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dandeline_core::{OrderId, OrderStatus, PaymentStatus};

use super::LineItem;

/// A customer order.
///
/// `stripe_checkout_session_id` is unique and is the idempotency key for
/// order materialization: one confirmed checkout session yields exactly
/// one order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub tax_amount: Option<Decimal>,
    pub shipping_cost: Option<Decimal>,
    pub total_amount: Decimal,
    pub currency: String,
    pub customer_email: Option<String>,
    pub customer_first_name: Option<String>,
    pub customer_last_name: Option<String>,
    pub customer_phone: Option<String>,
    pub shipping_address_line_1: Option<String>,
    pub shipping_address_line_2: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub shipping_country: Option<String>,
    pub shipping_method: Option<String>,
    pub tracking_number: Option<String>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub payment_transaction_id: Option<String>,
    pub payment_completed_at: Option<DateTime<Utc>>,
    pub stripe_checkout_session_id: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<LineItem>>,
}

impl Order {
    /// Customer display name, as captured at checkout.
    #[must_use]
    pub fn customer_name(&self) -> String {
        match (&self.customer_first_name, &self.customer_last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        }
    }
}

/// Eager-loadable relations of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderRelation {
    LineItems,
}

/// Input for creating an order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    /// Generated by the service when absent.
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    pub subtotal: Decimal,
    #[serde(default)]
    pub tax_amount: Option<Decimal>,
    #[serde(default)]
    pub shipping_cost: Option<Decimal>,
    pub total_amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_first_name: Option<String>,
    #[serde(default)]
    pub customer_last_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub shipping_address_line_1: Option<String>,
    #[serde(default)]
    pub shipping_address_line_2: Option<String>,
    #[serde(default)]
    pub shipping_city: Option<String>,
    #[serde(default)]
    pub shipping_state: Option<String>,
    #[serde(default)]
    pub shipping_postal_code: Option<String>,
    #[serde(default)]
    pub shipping_country: Option<String>,
    #[serde(default)]
    pub shipping_method: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_transaction_id: Option<String>,
    #[serde(default)]
    pub payment_completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stripe_checkout_session_id: Option<String>,
    #[serde(default)]
    pub stripe_payment_intent_id: Option<String>,
    #[serde(default)]
    pub stripe_customer_id: Option<String>,
}

/// Partial update of an order. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrder {
    pub status: Option<OrderStatus>,
    pub shipping_method: Option<String>,
    pub tracking_number: Option<String>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<String>,
    pub payment_transaction_id: Option<String>,
    pub payment_completed_at: Option<DateTime<Utc>>,
}
