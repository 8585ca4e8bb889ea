//! Typed subsets of the Stripe API objects this application consumes.
//!
//! Only the fields the checkout and catalog flows read are modeled;
//! everything else in the payloads is ignored.

use std::collections::HashMap;

use serde::Deserialize;

/// Paginated list envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct List<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

// =============================================================================
// Checkout sessions
// =============================================================================

/// A checkout session, optionally expanded with line items and customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page URL; present on freshly created sessions.
    pub url: Option<String>,
    pub amount_subtotal: Option<i64>,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub payment_intent: Option<String>,
    pub customer: Option<ExpandableCustomer>,
    pub customer_details: Option<CustomerDetails>,
    pub shipping_details: Option<ShippingDetails>,
    pub shipping_cost: Option<ShippingCost>,
    pub line_items: Option<List<SessionLineItem>>,
}

/// Customer contact details captured by the hosted checkout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerDetails {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Shipping details captured by the hosted checkout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShippingDetails {
    pub name: Option<String>,
    pub address: Option<Address>,
}

/// A postal address. Every field is optional; a digital-only cart has none.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// The shipping cost attached to a session.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingCost {
    pub amount_total: i64,
    pub shipping_rate: Option<String>,
}

/// A purchased line item inside a session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionLineItem {
    pub id: String,
    /// Customer-facing description as shown on the payment page.
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub amount_total: i64,
    pub currency: String,
    pub price: Option<SessionPrice>,
}

/// The price attached to a session line item.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionPrice {
    pub id: String,
    pub unit_amount: Option<i64>,
    pub currency: Option<String>,
    pub product: Option<ExpandableProduct>,
}

/// A customer reference: a bare id, or the object when expanded.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExpandableCustomer {
    Object(Customer),
    Id(String),
}

impl ExpandableCustomer {
    /// The customer id regardless of expansion.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Object(customer) => &customer.id,
            Self::Id(id) => id,
        }
    }
}

/// An expanded customer object.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// A product reference inside a price: a bare id, or the object when
/// expanded.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExpandableProduct {
    Object(SessionProduct),
    Id(String),
}

impl ExpandableProduct {
    /// The product id regardless of expansion.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Object(product) => &product.id,
            Self::Id(id) => id,
        }
    }
}

/// An expanded product object inside a session line item.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionProduct {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

// =============================================================================
// Catalog (products, prices, shipping rates)
// =============================================================================

/// A catalog product as returned by the product list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub package_dimensions: Option<PackageDimensions>,
    pub shippable: Option<bool>,
    pub tax_code: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub unit_label: Option<String>,
}

/// Shipping dimensions in inches, weight in ounces.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PackageDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

/// A catalog price as returned by the price list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPrice {
    pub id: String,
    pub active: bool,
    pub currency: String,
    #[serde(rename = "type")]
    pub price_type: String,
    pub unit_amount: Option<i64>,
    pub billing_scheme: Option<String>,
    pub nickname: Option<String>,
    pub recurring: Option<RecurringDetails>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Unix timestamp of creation upstream.
    pub created: i64,
    /// Owning product id.
    pub product: String,
}

/// Recurring billing descriptor of a price.
#[derive(Debug, Clone, Deserialize)]
pub struct RecurringDetails {
    pub interval: String,
    pub interval_count: Option<i64>,
    pub usage_type: Option<String>,
}

/// A shipping rate offered at checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingRate {
    pub id: String,
    pub active: bool,
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expandable_customer_both_shapes() {
        let bare: ExpandableCustomer =
            serde_json::from_str("\"cus_123\"").expect("bare id parses");
        assert_eq!(bare.id(), "cus_123");

        let expanded: ExpandableCustomer = serde_json::from_str(
            r#"{"id":"cus_456","email":"rose@example.com","name":"Rose Kim"}"#,
        )
        .expect("object parses");
        assert_eq!(expanded.id(), "cus_456");
    }

    #[test]
    fn test_session_parses_minimal_payload() {
        let session: CheckoutSession = serde_json::from_str(
            r#"{"id":"cs_test_1","amount_subtotal":5000,"amount_total":5400,"currency":"usd"}"#,
        )
        .expect("minimal session parses");

        assert_eq!(session.id, "cs_test_1");
        assert_eq!(session.amount_subtotal, Some(5000));
        assert!(session.shipping_details.is_none());
        assert!(session.line_items.is_none());
    }

    #[test]
    fn test_session_parses_expanded_line_items() {
        let session: CheckoutSession = serde_json::from_str(
            r#"{
                "id": "cs_test_2",
                "amount_subtotal": 3998,
                "amount_total": 3998,
                "currency": "usd",
                "payment_intent": "pi_1",
                "line_items": {
                    "data": [{
                        "id": "li_1",
                        "description": "Spring Bouquet",
                        "quantity": 2,
                        "amount_total": 3998,
                        "currency": "usd",
                        "price": {
                            "id": "price_1",
                            "unit_amount": 1999,
                            "currency": "usd",
                            "product": {
                                "id": "prod_1",
                                "name": "Spring Bouquet",
                                "images": ["https://img.example.com/1.jpg"]
                            }
                        }
                    }],
                    "has_more": false
                }
            }"#,
        )
        .expect("expanded session parses");

        let items = session.line_items.expect("line items present");
        let first = items.data.first().expect("one item");
        let price = first.price.as_ref().expect("price present");
        assert_eq!(
            price.product.as_ref().map(ExpandableProduct::id),
            Some("prod_1")
        );
    }

    #[test]
    fn test_catalog_price_type_field() {
        let price: CatalogPrice = serde_json::from_str(
            r#"{
                "id": "price_9",
                "active": true,
                "currency": "usd",
                "type": "recurring",
                "unit_amount": 2500,
                "recurring": {"interval": "month", "interval_count": 1, "usage_type": "licensed"},
                "created": 1723700000,
                "product": "prod_9"
            }"#,
        )
        .expect("catalog price parses");

        assert_eq!(price.price_type, "recurring");
        assert_eq!(
            price.recurring.as_ref().map(|r| r.interval.as_str()),
            Some("month")
        );
    }
}
