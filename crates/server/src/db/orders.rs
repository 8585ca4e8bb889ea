//! Order repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use dandeline_core::{OrderId, OrderStatus, PaymentStatus};

use super::{Repository, RepositoryError, not_found};
use crate::models::{NewOrder, Order, UpdateOrder};

const COLUMNS: &str = "id, order_number, status, subtotal, tax_amount, shipping_cost, \
     total_amount, currency, customer_email, customer_first_name, customer_last_name, \
     customer_phone, shipping_address_line_1, shipping_address_line_2, shipping_city, \
     shipping_state, shipping_postal_code, shipping_country, shipping_method, \
     tracking_number, shipped_at, delivered_at, payment_status, payment_method, \
     payment_transaction_id, payment_completed_at, stripe_checkout_session_id, \
     stripe_payment_intent_id, stripe_customer_id, created_at, updated_at";

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    order_number: String,
    status: OrderStatus,
    subtotal: Decimal,
    tax_amount: Option<Decimal>,
    shipping_cost: Option<Decimal>,
    total_amount: Decimal,
    currency: String,
    customer_email: Option<String>,
    customer_first_name: Option<String>,
    customer_last_name: Option<String>,
    customer_phone: Option<String>,
    shipping_address_line_1: Option<String>,
    shipping_address_line_2: Option<String>,
    shipping_city: Option<String>,
    shipping_state: Option<String>,
    shipping_postal_code: Option<String>,
    shipping_country: Option<String>,
    shipping_method: Option<String>,
    tracking_number: Option<String>,
    shipped_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
    payment_status: PaymentStatus,
    payment_method: Option<String>,
    payment_transaction_id: Option<String>,
    payment_completed_at: Option<DateTime<Utc>>,
    stripe_checkout_session_id: Option<String>,
    stripe_payment_intent_id: Option<String>,
    stripe_customer_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            order_number: row.order_number,
            status: row.status,
            subtotal: row.subtotal,
            tax_amount: row.tax_amount,
            shipping_cost: row.shipping_cost,
            total_amount: row.total_amount,
            currency: row.currency,
            customer_email: row.customer_email,
            customer_first_name: row.customer_first_name,
            customer_last_name: row.customer_last_name,
            customer_phone: row.customer_phone,
            shipping_address_line_1: row.shipping_address_line_1,
            shipping_address_line_2: row.shipping_address_line_2,
            shipping_city: row.shipping_city,
            shipping_state: row.shipping_state,
            shipping_postal_code: row.shipping_postal_code,
            shipping_country: row.shipping_country,
            shipping_method: row.shipping_method,
            tracking_number: row.tracking_number,
            shipped_at: row.shipped_at,
            delivered_at: row.delivered_at,
            payment_status: row.payment_status,
            payment_method: row.payment_method,
            payment_transaction_id: row.payment_transaction_id,
            payment_completed_at: row.payment_completed_at,
            stripe_checkout_session_id: row.stripe_checkout_session_id,
            stripe_payment_intent_id: row.stripe_payment_intent_id,
            stripe_customer_id: row.stripe_customer_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            line_items: None,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find the order materialized from a checkout session, if any.
    ///
    /// This is the idempotency probe for checkout confirmation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_checkout_session_id(
        &self,
        session_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {COLUMNS} FROM orders \
             WHERE stripe_checkout_session_id = $1 AND deleted_at IS NULL"
        ))
        .bind(session_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// Whether an order number is already in use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn order_number_exists(&self, order_number: &str) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE order_number = $1")
            .bind(order_number)
            .fetch_one(self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Live order count (admin dashboard).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE deleted_at IS NULL")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

impl Repository for OrderRepository<'_> {
    type Id = OrderId;
    type Entity = Order;
    type NewEntity = NewOrder;
    type UpdateEntity = UpdateOrder;

    async fn find_by_id(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {COLUMNS} FROM orders WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn store(&self, fields: NewOrder) -> Result<Order, RepositoryError> {
        let order_number = fields
            .order_number
            .ok_or_else(|| RepositoryError::DataCorruption("order_number not assigned".into()))?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders (order_number, status, subtotal, tax_amount, shipping_cost, \
             total_amount, currency, customer_email, customer_first_name, customer_last_name, \
             customer_phone, shipping_address_line_1, shipping_address_line_2, shipping_city, \
             shipping_state, shipping_postal_code, shipping_country, shipping_method, \
             payment_status, payment_method, payment_transaction_id, payment_completed_at, \
             stripe_checkout_session_id, stripe_payment_intent_id, stripe_customer_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21, $22, $23, $24, $25) \
             RETURNING {COLUMNS}"
        ))
        .bind(&order_number)
        .bind(fields.status)
        .bind(fields.subtotal)
        .bind(fields.tax_amount)
        .bind(fields.shipping_cost)
        .bind(fields.total_amount)
        .bind(&fields.currency)
        .bind(&fields.customer_email)
        .bind(&fields.customer_first_name)
        .bind(&fields.customer_last_name)
        .bind(&fields.customer_phone)
        .bind(&fields.shipping_address_line_1)
        .bind(&fields.shipping_address_line_2)
        .bind(&fields.shipping_city)
        .bind(&fields.shipping_state)
        .bind(&fields.shipping_postal_code)
        .bind(&fields.shipping_country)
        .bind(&fields.shipping_method)
        .bind(fields.payment_status)
        .bind(&fields.payment_method)
        .bind(&fields.payment_transaction_id)
        .bind(fields.payment_completed_at)
        .bind(&fields.stripe_checkout_session_id)
        .bind(&fields.stripe_payment_intent_id)
        .bind(&fields.stripe_customer_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, fields: UpdateOrder, entity: &Order) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET \
             status = COALESCE($2, status), \
             shipping_method = COALESCE($3, shipping_method), \
             tracking_number = COALESCE($4, tracking_number), \
             shipped_at = COALESCE($5, shipped_at), \
             delivered_at = COALESCE($6, delivered_at), \
             payment_status = COALESCE($7, payment_status), \
             payment_method = COALESCE($8, payment_method), \
             payment_transaction_id = COALESCE($9, payment_transaction_id), \
             payment_completed_at = COALESCE($10, payment_completed_at), \
             updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(entity.id.as_i32())
        .bind(fields.status)
        .bind(&fields.shipping_method)
        .bind(&fields.tracking_number)
        .bind(fields.shipped_at)
        .bind(fields.delivered_at)
        .bind(fields.payment_status)
        .bind(&fields.payment_method)
        .bind(&fields.payment_transaction_id)
        .bind(fields.payment_completed_at)
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn delete(&self, entity: &Order) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE orders SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(entity.id.as_i32())
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {COLUMNS} FROM orders WHERE deleted_at IS NULL ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }
}
