//! Checkout session creation and idempotent order materialization.
//!
//! The two halves of the storefront purchase flow:
//!
//! 1. **Session creation** - validate the cart against local prices and
//!    hand the customer off to Stripe's hosted payment page. No local
//!    order exists yet; abandoned checkouts leave nothing behind.
//! 2. **Confirmation** - on return from Stripe, materialize the order and
//!    its line item snapshots from the session payload, exactly once per
//!    session id.
//!
//! The session id is the sole idempotency key: repeated callbacks and
//! page refreshes find the existing order and short-circuit.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use dandeline_core::{OrderId, OrderStatus, PaymentStatus, money::minor_to_decimal};

use crate::config::ServerConfig;
use crate::db::{LineItemRepository, OrderRepository, PriceRepository, ProductRepository, RepositoryError};
use crate::models::{NewLineItem, NewOrder, Order, Product};
use crate::stripe::{
    CheckoutSession, CreateCheckoutSession, ExpandableProduct, SessionLineItem,
    SessionLineItemInput, StripeClient, StripeError,
};

use super::events::EventDispatcher;
use super::orders::OrderService;
use super::EntityService;

/// Quantity bounds per cart item.
pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 99;

/// How many shipping rates are offered at checkout.
const SHIPPING_RATE_LIMIT: u32 = 10;

/// One cart entry as submitted by the storefront.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    /// Stripe price id of the product variant being purchased.
    pub price_id: String,
    pub quantity: u32,
}

/// An opaque handle to a created checkout session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub session_id: String,
    /// Hosted payment page URL to redirect the customer to.
    pub url: Option<String>,
}

/// Errors from the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Cart input the customer can fix; the message is user-facing.
    #[error("{0}")]
    Validation(String),

    /// Database failure.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Stripe call failed; surfaced to the user only as a generic message.
    #[error("stripe error: {0}")]
    Stripe(#[from] StripeError),
}

/// Checkout workflow service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
    stripe: &'a StripeClient,
    config: &'a ServerConfig,
    dispatcher: &'a EventDispatcher,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        stripe: &'a StripeClient,
        config: &'a ServerConfig,
        dispatcher: &'a EventDispatcher,
    ) -> Self {
        Self {
            pool,
            stripe,
            config,
            dispatcher,
        }
    }

    /// Build and create a hosted checkout session from cart contents.
    ///
    /// Validates every cart item against the local catalog before calling
    /// out. Shipping rates are fetched best-effort: a failure there omits
    /// shipping options rather than failing the whole checkout.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Validation` for a bad cart and
    /// `CheckoutError::Stripe` when session creation fails upstream.
    pub async fn create_session(&self, items: &[CartItem]) -> Result<SessionHandle, CheckoutError> {
        if items.is_empty() {
            return Err(CheckoutError::Validation(
                "You must select at least one item.".to_string(),
            ));
        }

        let prices = PriceRepository::new(self.pool);

        for item in items {
            validate_quantity(item.quantity)?;

            match prices.find_by_stripe_id(&item.price_id).await? {
                None => {
                    return Err(CheckoutError::Validation(
                        "The selected price is invalid.".to_string(),
                    ));
                }
                Some(price) if !price.active => {
                    return Err(CheckoutError::Validation(
                        "The selected price is no longer available.".to_string(),
                    ));
                }
                Some(_) => {}
            }
        }

        // Cart contents ride along in session metadata for audit/debugging
        let cart_items: serde_json::Map<String, serde_json::Value> = items
            .iter()
            .map(|item| (item.price_id.clone(), serde_json::Value::from(item.quantity)))
            .collect();

        let request = CreateCheckoutSession {
            line_items: items
                .iter()
                .map(|item| SessionLineItemInput {
                    price: item.price_id.clone(),
                    quantity: item.quantity,
                })
                .collect(),
            success_url: self.config.checkout_success_url(),
            cancel_url: self.config.checkout_cancel_url(),
            collect_shipping_address: true,
            collect_phone_number: true,
            always_create_customer: true,
            metadata: vec![
                (
                    "cart_items".to_string(),
                    serde_json::Value::Object(cart_items).to_string(),
                ),
                ("source".to_string(), "website_store".to_string()),
            ],
            shipping_rates: self.shipping_rate_options().await,
        };

        let session = self
            .stripe
            .create_checkout_session(&request)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    item_count = items.len(),
                    "Checkout session creation failed"
                );
            })?;

        tracing::info!(session_id = %session.id, "Checkout session created");

        Ok(SessionHandle {
            session_id: session.id,
            url: session.url,
        })
    }

    /// Confirm a completed checkout session, materializing the order.
    ///
    /// Idempotent on the session id: when an order for it already exists,
    /// that order is returned and nothing is created.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Stripe` when the session cannot be fetched
    /// and `CheckoutError::Repository` when persisting the order fails.
    /// Individual line-item failures are logged and skipped, never
    /// propagated.
    pub async fn confirm_session(&self, session_id: &str) -> Result<Order, CheckoutError> {
        let orders = OrderRepository::new(self.pool);

        // Guards against repeated callback delivery and page refreshes
        if let Some(existing) = orders.find_by_checkout_session_id(session_id).await? {
            tracing::info!(
                session_id = %session_id,
                order_number = %existing.order_number,
                "Checkout session already materialized"
            );
            return Ok(existing);
        }

        let session = self
            .stripe
            .retrieve_checkout_session(session_id)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    session_id = %session_id,
                    error = %e,
                    "Failed to retrieve checkout session"
                );
            })?;

        let order_service = OrderService::new(self.pool, self.dispatcher);
        let fields = order_fields_from_session(&session, Utc::now());
        let mut order = order_service.store(fields, Some(&[])).await?;

        // Order first (it owns the id), then the line items. A bad item is
        // logged and skipped; the order and its good items stay committed.
        let products = ProductRepository::new(self.pool);
        let line_items = LineItemRepository::new(self.pool);

        let session_items = session
            .line_items
            .as_ref()
            .map(|list| list.data.as_slice())
            .unwrap_or_default();

        let mut materialized = Vec::with_capacity(session_items.len());
        for item in session_items {
            match self
                .materialize_line_item(&products, &line_items, item, order.id)
                .await
            {
                Ok(line_item) => materialized.push(line_item),
                Err(e) => {
                    tracing::error!(
                        order_id = %order.id,
                        session_line_item = %item.id,
                        error = %e,
                        "Failed to materialize line item"
                    );
                }
            }
        }
        order.line_items = Some(materialized);

        tracing::info!(
            session_id = %session_id,
            order_number = %order.order_number,
            "Order materialized from checkout session"
        );

        Ok(order)
    }

    async fn materialize_line_item(
        &self,
        products: &ProductRepository<'_>,
        line_items: &LineItemRepository<'_>,
        item: &SessionLineItem,
        order_id: OrderId,
    ) -> Result<crate::models::LineItem, CheckoutError> {
        // Historical/deleted products leave product_id unset
        let product = match stripe_product_id(item) {
            Some(id) => products.find_by_stripe_id(id).await?,
            None => None,
        };

        let fields = line_item_fields(item, product.as_ref(), order_id);
        Ok(line_items.store(fields).await?)
    }

    /// Active shipping rates to offer, or none when the lookup fails.
    async fn shipping_rate_options(&self) -> Vec<String> {
        match self.stripe.list_shipping_rates(SHIPPING_RATE_LIMIT).await {
            Ok(rates) => rates
                .data
                .into_iter()
                .filter(|rate| rate.active)
                .map(|rate| rate.id)
                .collect(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch shipping rates");
                Vec::new()
            }
        }
    }
}

/// Validate a cart item quantity against the allowed bounds.
fn validate_quantity(quantity: u32) -> Result<(), CheckoutError> {
    if quantity < MIN_QUANTITY {
        return Err(CheckoutError::Validation(
            "Quantity must be at least 1.".to_string(),
        ));
    }
    if quantity > MAX_QUANTITY {
        return Err(CheckoutError::Validation(
            "Quantity cannot exceed 99.".to_string(),
        ));
    }
    Ok(())
}

/// Split a customer's full name at the first space.
///
/// Everything after the first space becomes the last name, so "Mary Jane
/// Watson" yields ("Mary", "Jane Watson") and a multi-word first name is
/// mis-split. Known limitation, kept for compatibility with existing
/// order rows.
#[must_use]
pub fn split_customer_name(name: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return (None, None);
    };

    match name.split_once(' ') {
        Some((first, rest)) => (Some(first.to_string()), Some(rest.trim().to_string())),
        None => (Some(name.to_string()), None),
    }
}

/// Map a retrieved session onto the order fields to persist.
///
/// Minor-unit amounts become currency-unit decimals here. Tax is only set
/// when the session total exceeds the subtotal (`None` otherwise, never
/// zero); shipping cost comes from the session's shipping-cost object
/// when present. The payment fields are hard-set to paid: this mapping
/// only runs on the success path.
#[must_use]
pub fn order_fields_from_session(session: &CheckoutSession, now: DateTime<Utc>) -> NewOrder {
    let amount_subtotal = session.amount_subtotal.unwrap_or(0);
    let amount_total = session.amount_total.unwrap_or(0);

    let tax_amount = (amount_total > amount_subtotal)
        .then(|| minor_to_decimal(amount_total - amount_subtotal));
    let shipping_cost = session
        .shipping_cost
        .as_ref()
        .map(|cost| minor_to_decimal(cost.amount_total));

    let details = session.customer_details.as_ref();
    let (customer_first_name, customer_last_name) =
        split_customer_name(details.and_then(|d| d.name.as_deref()));

    // A guest/digital checkout may carry no shipping details at all
    let address = session
        .shipping_details
        .as_ref()
        .and_then(|details| details.address.as_ref());

    NewOrder {
        order_number: None,
        status: OrderStatus::Processing,
        subtotal: minor_to_decimal(amount_subtotal),
        tax_amount,
        shipping_cost,
        total_amount: minor_to_decimal(amount_total),
        currency: session
            .currency
            .as_deref()
            .unwrap_or("usd")
            .to_uppercase(),
        customer_email: details.and_then(|d| d.email.clone()),
        customer_first_name,
        customer_last_name,
        customer_phone: details.and_then(|d| d.phone.clone()),
        shipping_address_line_1: address.and_then(|a| a.line1.clone()),
        shipping_address_line_2: address.and_then(|a| a.line2.clone()),
        shipping_city: address.and_then(|a| a.city.clone()),
        shipping_state: address.and_then(|a| a.state.clone()),
        shipping_postal_code: address.and_then(|a| a.postal_code.clone()),
        shipping_country: address.and_then(|a| a.country.clone()),
        shipping_method: None,
        payment_status: PaymentStatus::Paid,
        payment_method: Some("stripe".to_string()),
        payment_transaction_id: session.payment_intent.clone(),
        payment_completed_at: Some(now),
        stripe_checkout_session_id: Some(session.id.clone()),
        stripe_payment_intent_id: session.payment_intent.clone(),
        stripe_customer_id: session
            .customer
            .as_ref()
            .map(|customer| customer.id().to_string()),
    }
}

/// The Stripe product id embedded in a session line item's price.
#[must_use]
pub fn stripe_product_id(item: &SessionLineItem) -> Option<&str> {
    item.price
        .as_ref()
        .and_then(|price| price.product.as_ref())
        .map(ExpandableProduct::id)
}

/// Map one session line item (plus the resolved local product, when any)
/// onto the snapshot fields to persist.
///
/// The name comes from the session's own data to preserve exactly what
/// the customer saw at purchase time; sku/description/image fall back to
/// the local product where the session has nothing.
#[must_use]
pub fn line_item_fields(
    item: &SessionLineItem,
    product: Option<&Product>,
    order_id: OrderId,
) -> NewLineItem {
    let session_product = item.price.as_ref().and_then(|price| {
        price.product.as_ref().and_then(|p| match p {
            ExpandableProduct::Object(object) => Some(object),
            ExpandableProduct::Id(_) => None,
        })
    });

    let product_name = item
        .description
        .clone()
        .or_else(|| session_product.and_then(|p| p.name.clone()))
        .or_else(|| product.map(|p| p.name.clone()))
        .unwrap_or_else(|| "Item".to_string());

    let product_description = session_product
        .and_then(|p| p.description.clone())
        .or_else(|| product.map(|p| p.description.clone()));

    let product_image_url = session_product
        .and_then(|p| p.images.first().cloned())
        .or_else(|| product.and_then(|p| p.image_url.clone()));

    let unit_amount = item
        .price
        .as_ref()
        .and_then(|price| price.unit_amount)
        .unwrap_or(0);

    NewLineItem {
        order_id,
        product_id: product.map(|p| p.id),
        product_name,
        product_sku: product.and_then(|p| p.sku.clone()),
        product_description,
        product_image_url,
        quantity: i32::try_from(item.quantity.unwrap_or(1)).unwrap_or(1),
        unit_price: minor_to_decimal(unit_amount),
        total_price: minor_to_decimal(item.amount_total),
        currency: item.currency.to_uppercase(),
        stripe_price_id: item.price.as_ref().map(|price| price.id.clone()),
        stripe_product_id: stripe_product_id(item).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stripe::types::{
        Address, CustomerDetails, ExpandableCustomer, List, SessionPrice, SessionProduct,
        ShippingCost, ShippingDetails,
    };
    use rust_decimal::Decimal;

    fn session_with_amounts(subtotal: i64, total: i64) -> CheckoutSession {
        CheckoutSession {
            id: "cs_test_1".to_string(),
            url: None,
            amount_subtotal: Some(subtotal),
            amount_total: Some(total),
            currency: Some("usd".to_string()),
            payment_intent: Some("pi_1".to_string()),
            customer: Some(ExpandableCustomer::Id("cus_1".to_string())),
            customer_details: Some(CustomerDetails {
                email: Some("mary@example.com".to_string()),
                name: Some("Mary Jane Watson".to_string()),
                phone: Some("+13125550100".to_string()),
            }),
            shipping_details: Some(ShippingDetails {
                name: None,
                address: Some(Address {
                    line1: Some("12 Petal Way".to_string()),
                    line2: None,
                    city: Some("Chicago".to_string()),
                    state: Some("IL".to_string()),
                    postal_code: Some("60601".to_string()),
                    country: Some("US".to_string()),
                }),
            }),
            shipping_cost: None,
            line_items: None,
        }
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(99).is_ok());
        assert!(validate_quantity(100).is_err());
    }

    #[test]
    fn test_split_customer_name_first_space() {
        assert_eq!(
            split_customer_name(Some("Mary Jane Watson")),
            (Some("Mary".to_string()), Some("Jane Watson".to_string()))
        );
        assert_eq!(
            split_customer_name(Some("Cher")),
            (Some("Cher".to_string()), None)
        );
        assert_eq!(split_customer_name(None), (None, None));
        assert_eq!(split_customer_name(Some("  ")), (None, None));
    }

    #[test]
    fn test_order_amounts_from_cents() {
        // 5000/5400 cents -> 50.00 subtotal, 4.00 tax, 54.00 total
        let session = session_with_amounts(5000, 5400);
        let fields = order_fields_from_session(&session, Utc::now());

        assert_eq!(fields.subtotal, Decimal::new(5000, 2));
        assert_eq!(fields.tax_amount, Some(Decimal::new(400, 2)));
        assert_eq!(fields.total_amount, Decimal::new(5400, 2));
        assert_eq!(fields.currency, "USD");
    }

    #[test]
    fn test_tax_is_none_not_zero_when_total_equals_subtotal() {
        let session = session_with_amounts(5000, 5000);
        let fields = order_fields_from_session(&session, Utc::now());
        assert_eq!(fields.tax_amount, None);
    }

    #[test]
    fn test_shipping_cost_from_session_object() {
        let mut session = session_with_amounts(5000, 5995);
        session.shipping_cost = Some(ShippingCost {
            amount_total: 995,
            shipping_rate: Some("shr_1".to_string()),
        });

        let fields = order_fields_from_session(&session, Utc::now());
        assert_eq!(fields.shipping_cost, Some(Decimal::new(995, 2)));
    }

    #[test]
    fn test_order_payment_fields_are_paid() {
        let now = Utc::now();
        let fields = order_fields_from_session(&session_with_amounts(100, 100), now);

        assert_eq!(fields.payment_status, PaymentStatus::Paid);
        assert_eq!(fields.payment_method.as_deref(), Some("stripe"));
        assert_eq!(fields.payment_completed_at, Some(now));
        assert_eq!(
            fields.stripe_checkout_session_id.as_deref(),
            Some("cs_test_1")
        );
        assert_eq!(fields.stripe_customer_id.as_deref(), Some("cus_1"));
        assert_eq!(fields.status, OrderStatus::Processing);
    }

    #[test]
    fn test_order_survives_missing_shipping_details() {
        // Guest checkout with a digital-only cart has no shipping details
        let mut session = session_with_amounts(1500, 1500);
        session.shipping_details = None;
        session.customer_details = None;
        session.customer = None;

        let fields = order_fields_from_session(&session, Utc::now());
        assert_eq!(fields.shipping_address_line_1, None);
        assert_eq!(fields.customer_email, None);
        assert_eq!(fields.customer_first_name, None);
        assert_eq!(fields.stripe_customer_id, None);
    }

    fn session_line_item(with_product: bool) -> SessionLineItem {
        SessionLineItem {
            id: "li_1".to_string(),
            description: Some("Spring Bouquet".to_string()),
            quantity: Some(2),
            amount_total: 3998,
            currency: "usd".to_string(),
            price: Some(SessionPrice {
                id: "price_1".to_string(),
                unit_amount: Some(1999),
                currency: Some("usd".to_string()),
                product: Some(if with_product {
                    ExpandableProduct::Object(SessionProduct {
                        id: "prod_1".to_string(),
                        name: Some("Spring Bouquet".to_string()),
                        description: Some("A dozen seasonal stems".to_string()),
                        images: vec!["https://img.example.com/spring.jpg".to_string()],
                    })
                } else {
                    ExpandableProduct::Id("prod_1".to_string())
                }),
            }),
        }
    }

    #[test]
    fn test_line_item_snapshot_prefers_session_data() {
        let item = session_line_item(true);
        let fields = line_item_fields(&item, None, OrderId::new(5));

        assert_eq!(fields.order_id, OrderId::new(5));
        assert_eq!(fields.product_id, None);
        assert_eq!(fields.product_name, "Spring Bouquet");
        assert_eq!(
            fields.product_description.as_deref(),
            Some("A dozen seasonal stems")
        );
        assert_eq!(
            fields.product_image_url.as_deref(),
            Some("https://img.example.com/spring.jpg")
        );
        assert_eq!(fields.quantity, 2);
        assert_eq!(fields.unit_price, Decimal::new(1999, 2));
        assert_eq!(fields.total_price, Decimal::new(3998, 2));
        assert_eq!(fields.currency, "USD");
        assert_eq!(fields.stripe_price_id.as_deref(), Some("price_1"));
        assert_eq!(fields.stripe_product_id.as_deref(), Some("prod_1"));
    }

    #[test]
    fn test_line_item_falls_back_to_local_product() {
        use chrono::Utc;
        use dandeline_core::{CategoryId, ProductId};

        let local = Product {
            id: ProductId::new(42),
            stripe_product_id: Some("prod_1".to_string()),
            category_id: CategoryId::new(1),
            name: "Spring Bouquet".to_string(),
            slug: "spring-bouquet".to_string(),
            description: "Local description".to_string(),
            sku: Some("SB-12".to_string()),
            image_url: Some("https://img.example.com/local.jpg".to_string()),
            images: None,
            package_dimensions: None,
            weight: None,
            shippable: true,
            tax_code: None,
            metadata: None,
            unit_label: None,
            is_active: true,
            is_featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            category: None,
            prices: None,
            line_items: None,
        };

        // Unexpanded product object in the session: sku/desc/image come local
        let item = session_line_item(false);
        let fields = line_item_fields(&item, Some(&local), OrderId::new(5));

        assert_eq!(fields.product_id, Some(ProductId::new(42)));
        assert_eq!(fields.product_sku.as_deref(), Some("SB-12"));
        assert_eq!(fields.product_description.as_deref(), Some("Local description"));
        assert_eq!(
            fields.product_image_url.as_deref(),
            Some("https://img.example.com/local.jpg")
        );
    }

    #[test]
    fn test_stripe_product_id_through_expansion() {
        assert_eq!(stripe_product_id(&session_line_item(true)), Some("prod_1"));
        assert_eq!(stripe_product_id(&session_line_item(false)), Some("prod_1"));

        let mut bare = session_line_item(true);
        bare.price = None;
        assert_eq!(stripe_product_id(&bare), None);
    }

    #[test]
    fn test_session_list_default_when_absent() {
        let session = session_with_amounts(100, 100);
        let items: &[SessionLineItem] = session
            .line_items
            .as_ref()
            .map(|list: &List<SessionLineItem>| list.data.as_slice())
            .unwrap_or_default();
        assert!(items.is_empty());
    }
}
