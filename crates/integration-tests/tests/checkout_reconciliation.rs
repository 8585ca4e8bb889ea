//! Integration tests for the checkout reconciliation mapping.
//!
//! These cover the testable properties of the session-to-order flow that
//! hold without a live store: amount conversion, the tax-only-when-positive
//! rule, name splitting, defensive address copying, and line item
//! snapshots.

use chrono::Utc;
use rust_decimal::Decimal;

use dandeline_core::{OrderId, OrderStatus, PaymentStatus};
use dandeline_server::services::checkout::{
    line_item_fields, order_fields_from_session, split_customer_name, stripe_product_id,
};
use dandeline_server::stripe::types::{
    Address, CheckoutSession, CustomerDetails, ExpandableCustomer, ExpandableProduct, List,
    SessionLineItem, SessionPrice, SessionProduct, ShippingCost, ShippingDetails,
};

// =============================================================================
// Session fixtures
// =============================================================================

fn confirmed_session() -> CheckoutSession {
    CheckoutSession {
        id: "cs_live_abc".to_string(),
        url: None,
        amount_subtotal: Some(5000),
        amount_total: Some(5400),
        currency: Some("usd".to_string()),
        payment_intent: Some("pi_xyz".to_string()),
        customer: Some(ExpandableCustomer::Id("cus_42".to_string())),
        customer_details: Some(CustomerDetails {
            email: Some("fern@example.com".to_string()),
            name: Some("Fern de la Cruz".to_string()),
            phone: Some("+13035550188".to_string()),
        }),
        shipping_details: Some(ShippingDetails {
            name: Some("Fern de la Cruz".to_string()),
            address: Some(Address {
                line1: Some("800 Larkspur Ln".to_string()),
                line2: Some("Unit 4".to_string()),
                city: Some("Denver".to_string()),
                state: Some("CO".to_string()),
                postal_code: Some("80202".to_string()),
                country: Some("US".to_string()),
            }),
        }),
        shipping_cost: Some(ShippingCost {
            amount_total: 0,
            shipping_rate: None,
        }),
        line_items: Some(List {
            data: vec![SessionLineItem {
                id: "li_1".to_string(),
                description: Some("Garden Rose Bouquet".to_string()),
                quantity: Some(1),
                amount_total: 5000,
                currency: "usd".to_string(),
                price: Some(SessionPrice {
                    id: "price_gr".to_string(),
                    unit_amount: Some(5000),
                    currency: Some("usd".to_string()),
                    product: Some(ExpandableProduct::Object(SessionProduct {
                        id: "prod_gr".to_string(),
                        name: Some("Garden Rose Bouquet".to_string()),
                        description: Some("Two dozen garden roses".to_string()),
                        images: vec![],
                    })),
                }),
            }],
            has_more: false,
        }),
    }
}

// =============================================================================
// Order field mapping
// =============================================================================

#[test]
fn session_amounts_become_currency_decimals() {
    // amount_subtotal = 5000, amount_total = 5400 (cents)
    // -> subtotal 50.00, tax 4.00, total 54.00
    let fields = order_fields_from_session(&confirmed_session(), Utc::now());

    assert_eq!(fields.subtotal, Decimal::new(5000, 2));
    assert_eq!(fields.tax_amount, Some(Decimal::new(400, 2)));
    assert_eq!(fields.total_amount, Decimal::new(5400, 2));

    // total = subtotal + tax + shipping, within currency rounding
    let shipping = fields.shipping_cost.unwrap_or_default();
    let tax = fields.tax_amount.unwrap_or_default();
    assert_eq!(fields.subtotal + tax + shipping, fields.total_amount);
}

#[test]
fn tax_stays_unset_when_session_has_no_tax() {
    let mut session = confirmed_session();
    session.amount_total = Some(5000);
    session.shipping_cost = None;

    let fields = order_fields_from_session(&session, Utc::now());
    assert_eq!(fields.tax_amount, None, "zero tax must map to None, not 0.00");
}

#[test]
fn materialization_is_marked_paid_with_session_keys() {
    let now = Utc::now();
    let fields = order_fields_from_session(&confirmed_session(), now);

    assert_eq!(fields.status, OrderStatus::Processing);
    assert_eq!(fields.payment_status, PaymentStatus::Paid);
    assert_eq!(fields.payment_method.as_deref(), Some("stripe"));
    assert_eq!(fields.payment_completed_at, Some(now));
    assert_eq!(fields.payment_transaction_id.as_deref(), Some("pi_xyz"));
    assert_eq!(fields.stripe_checkout_session_id.as_deref(), Some("cs_live_abc"));
    assert_eq!(fields.stripe_payment_intent_id.as_deref(), Some("pi_xyz"));
    assert_eq!(fields.stripe_customer_id.as_deref(), Some("cus_42"));
}

#[test]
fn shipping_address_copies_every_field() {
    let fields = order_fields_from_session(&confirmed_session(), Utc::now());

    assert_eq!(fields.shipping_address_line_1.as_deref(), Some("800 Larkspur Ln"));
    assert_eq!(fields.shipping_address_line_2.as_deref(), Some("Unit 4"));
    assert_eq!(fields.shipping_city.as_deref(), Some("Denver"));
    assert_eq!(fields.shipping_state.as_deref(), Some("CO"));
    assert_eq!(fields.shipping_postal_code.as_deref(), Some("80202"));
    assert_eq!(fields.shipping_country.as_deref(), Some("US"));
}

#[test]
fn guest_checkout_without_shipping_details_maps_cleanly() {
    let mut session = confirmed_session();
    session.shipping_details = None;
    session.shipping_cost = None;
    session.customer_details = None;

    let fields = order_fields_from_session(&session, Utc::now());

    assert_eq!(fields.shipping_address_line_1, None);
    assert_eq!(fields.shipping_cost, None);
    assert_eq!(fields.customer_email, None);
    assert_eq!(fields.customer_first_name, None);
    assert_eq!(fields.customer_last_name, None);
}

// =============================================================================
// Name splitting (documented first-space limitation)
// =============================================================================

#[test]
fn customer_name_splits_at_first_space() {
    let fields = order_fields_from_session(&confirmed_session(), Utc::now());

    // "Fern de la Cruz": everything after the first space is the last name
    assert_eq!(fields.customer_first_name.as_deref(), Some("Fern"));
    assert_eq!(fields.customer_last_name.as_deref(), Some("de la Cruz"));
}

#[test]
fn single_word_names_have_no_last_name() {
    assert_eq!(
        split_customer_name(Some("Beyonce")),
        (Some("Beyonce".to_string()), None)
    );
}

// =============================================================================
// Line item snapshots
// =============================================================================

#[test]
fn line_item_snapshot_captures_session_presentation() {
    let session = confirmed_session();
    let item = &session.line_items.as_ref().expect("line items").data[0];

    let fields = line_item_fields(item, None, OrderId::new(11));

    assert_eq!(fields.order_id, OrderId::new(11));
    assert_eq!(fields.product_name, "Garden Rose Bouquet");
    assert_eq!(fields.product_description.as_deref(), Some("Two dozen garden roses"));
    assert_eq!(fields.unit_price, Decimal::new(5000, 2));
    assert_eq!(fields.total_price, Decimal::new(5000, 2));
    assert_eq!(fields.currency, "USD");
    assert_eq!(fields.stripe_price_id.as_deref(), Some("price_gr"));
    assert_eq!(fields.stripe_product_id.as_deref(), Some("prod_gr"));
    // No local product matched: the snapshot stands alone
    assert_eq!(fields.product_id, None);
    assert_eq!(fields.product_sku, None);
}

#[test]
fn product_reference_resolves_through_expansion_or_bare_id() {
    let session = confirmed_session();
    let item = &session.line_items.as_ref().expect("line items").data[0];
    assert_eq!(stripe_product_id(item), Some("prod_gr"));

    let mut bare = item.clone();
    bare.price = Some(SessionPrice {
        id: "price_gr".to_string(),
        unit_amount: Some(5000),
        currency: Some("usd".to_string()),
        product: Some(ExpandableProduct::Id("prod_gr".to_string())),
    });
    assert_eq!(stripe_product_id(&bare), Some("prod_gr"));
}
