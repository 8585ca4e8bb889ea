//! Line item repository.
//!
//! Line items are append-only snapshots; there is no update or soft
//! delete. Rows follow their order's lifecycle via the foreign key.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use dandeline_core::{LineItemId, OrderId, ProductId};

use super::{RepositoryError, not_found};
use crate::models::{LineItem, NewLineItem};

const COLUMNS: &str = "id, order_id, product_id, product_name, product_sku, \
     product_description, product_image_url, quantity, unit_price, total_price, currency, \
     stripe_price_id, stripe_product_id, created_at, updated_at";

/// Internal row type for line item queries.
#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    id: i32,
    order_id: i32,
    product_id: Option<i32>,
    product_name: String,
    product_sku: Option<String>,
    product_description: Option<String>,
    product_image_url: Option<String>,
    quantity: i32,
    unit_price: Decimal,
    total_price: Decimal,
    currency: String,
    stripe_price_id: Option<String>,
    stripe_product_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LineItemRow> for LineItem {
    fn from(row: LineItemRow) -> Self {
        Self {
            id: LineItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: row.product_id.map(ProductId::new),
            product_name: row.product_name,
            product_sku: row.product_sku,
            product_description: row.product_description,
            product_image_url: row.product_image_url,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total_price: row.total_price,
            currency: row.currency,
            stripe_price_id: row.stripe_price_id,
            stripe_product_id: row.stripe_product_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for line item database operations.
pub struct LineItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LineItemRepository<'a> {
    /// Create a new line item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch one line item by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when no row has that id.
    pub async fn find_by_id(&self, id: LineItemId) -> Result<LineItem, RepositoryError> {
        let row = sqlx::query_as::<_, LineItemRow>(&format!(
            "SELECT {COLUMNS} FROM line_items WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    /// Insert a new line item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn store(&self, fields: NewLineItem) -> Result<LineItem, RepositoryError> {
        let row = sqlx::query_as::<_, LineItemRow>(&format!(
            "INSERT INTO line_items (order_id, product_id, product_name, product_sku, \
             product_description, product_image_url, quantity, unit_price, total_price, \
             currency, stripe_price_id, stripe_product_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        ))
        .bind(fields.order_id.as_i32())
        .bind(fields.product_id.map(|id| id.as_i32()))
        .bind(&fields.product_name)
        .bind(&fields.product_sku)
        .bind(&fields.product_description)
        .bind(&fields.product_image_url)
        .bind(fields.quantity)
        .bind(fields.unit_price)
        .bind(fields.total_price)
        .bind(&fields.currency)
        .bind(&fields.stripe_price_id)
        .bind(&fields.stripe_product_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List an order's line items in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_order(&self, order_id: OrderId) -> Result<Vec<LineItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, LineItemRow>(&format!(
            "SELECT {COLUMNS} FROM line_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(order_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(LineItem::from).collect())
    }

    /// List the historical line items referencing a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<LineItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, LineItemRow>(&format!(
            "SELECT {COLUMNS} FROM line_items WHERE product_id = $1 ORDER BY id DESC"
        ))
        .bind(product_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(LineItem::from).collect())
    }
}
