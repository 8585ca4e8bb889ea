//! Price repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use dandeline_core::{PriceId, PriceType, ProductId};

use super::{Repository, RepositoryError, not_found};
use crate::models::{NewPrice, Price, UpdatePrice};

const COLUMNS: &str = "id, stripe_price_id, product_id, active, is_current, currency, \
     price_type, unit_amount, unit_amount_minor, billing_scheme, recurring, nickname, \
     metadata, stripe_created_at, created_at, updated_at";

/// Internal row type for price queries.
#[derive(Debug, sqlx::FromRow)]
struct PriceRow {
    id: i32,
    stripe_price_id: String,
    product_id: i32,
    active: bool,
    is_current: bool,
    currency: String,
    price_type: PriceType,
    unit_amount: Decimal,
    unit_amount_minor: Option<i64>,
    billing_scheme: Option<String>,
    recurring: Option<serde_json::Value>,
    nickname: Option<String>,
    metadata: Option<serde_json::Value>,
    stripe_created_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PriceRow> for Price {
    fn from(row: PriceRow) -> Self {
        Self {
            id: PriceId::new(row.id),
            stripe_price_id: row.stripe_price_id,
            product_id: ProductId::new(row.product_id),
            active: row.active,
            is_current: row.is_current,
            currency: row.currency,
            price_type: row.price_type,
            unit_amount: row.unit_amount,
            unit_amount_minor: row.unit_amount_minor,
            billing_scheme: row.billing_scheme,
            recurring: row.recurring,
            nickname: row.nickname,
            metadata: row.metadata,
            stripe_created_at: row.stripe_created_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            product: None,
        }
    }
}

/// Repository for price database operations.
pub struct PriceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PriceRepository<'a> {
    /// Create a new price repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a price by its Stripe price id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_stripe_id(
        &self,
        stripe_price_id: &str,
    ) -> Result<Option<Price>, RepositoryError> {
        let row = sqlx::query_as::<_, PriceRow>(&format!(
            "SELECT {COLUMNS} FROM prices WHERE stripe_price_id = $1 AND deleted_at IS NULL"
        ))
        .bind(stripe_price_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Price::from))
    }

    /// List a product's prices, current first, then cheapest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Price>, RepositoryError> {
        let rows = sqlx::query_as::<_, PriceRow>(&format!(
            "SELECT {COLUMNS} FROM prices \
             WHERE product_id = $1 AND deleted_at IS NULL \
             ORDER BY is_current DESC, unit_amount"
        ))
        .bind(product_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Price::from).collect())
    }

    /// Whether the product already has a current price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn has_current(&self, product_id: ProductId) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM prices \
             WHERE product_id = $1 AND is_current = TRUE AND deleted_at IS NULL",
        )
        .bind(product_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Clear the current flag on every price of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn clear_current(&self, product_id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE prices SET is_current = FALSE, updated_at = NOW() WHERE product_id = $1")
            .bind(product_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Mark one price of a product as current.
    ///
    /// The caller clears the previous flag first; this only sets the new one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the price does not belong to
    /// the product.
    pub async fn set_current(
        &self,
        product_id: ProductId,
        price_id: PriceId,
    ) -> Result<Price, RepositoryError> {
        let row = sqlx::query_as::<_, PriceRow>(&format!(
            "UPDATE prices SET is_current = TRUE, updated_at = NOW() \
             WHERE id = $1 AND product_id = $2 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(price_id.as_i32())
        .bind(product_id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    /// Deactivate a product's prices whose Stripe ids are not in `keep`.
    ///
    /// Used after a catalog sync to delist prices removed upstream. Rows
    /// are kept (soft delist), only `active` is cleared. Returns the number
    /// of prices delisted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn deactivate_missing(
        &self,
        product_id: ProductId,
        keep: &[String],
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE prices SET active = FALSE, updated_at = NOW() \
             WHERE product_id = $1 AND active = TRUE AND deleted_at IS NULL \
             AND stripe_price_id <> ALL($2)",
        )
        .bind(product_id.as_i32())
        .bind(keep)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

impl Repository for PriceRepository<'_> {
    type Id = PriceId;
    type Entity = Price;
    type NewEntity = NewPrice;
    type UpdateEntity = UpdatePrice;

    async fn find_by_id(&self, id: PriceId) -> Result<Price, RepositoryError> {
        let row = sqlx::query_as::<_, PriceRow>(&format!(
            "SELECT {COLUMNS} FROM prices WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn store(&self, fields: NewPrice) -> Result<Price, RepositoryError> {
        let row = sqlx::query_as::<_, PriceRow>(&format!(
            "INSERT INTO prices (stripe_price_id, product_id, active, is_current, currency, \
             price_type, unit_amount, unit_amount_minor, billing_scheme, recurring, nickname, \
             metadata, stripe_created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        ))
        .bind(&fields.stripe_price_id)
        .bind(fields.product_id.as_i32())
        .bind(fields.active)
        .bind(fields.is_current)
        .bind(&fields.currency)
        .bind(fields.price_type)
        .bind(fields.unit_amount)
        .bind(fields.unit_amount_minor)
        .bind(&fields.billing_scheme)
        .bind(&fields.recurring)
        .bind(&fields.nickname)
        .bind(&fields.metadata)
        .bind(fields.stripe_created_at)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, fields: UpdatePrice, entity: &Price) -> Result<Price, RepositoryError> {
        let row = sqlx::query_as::<_, PriceRow>(&format!(
            "UPDATE prices SET \
             active = COALESCE($2, active), \
             is_current = COALESCE($3, is_current), \
             currency = COALESCE($4, currency), \
             price_type = COALESCE($5, price_type), \
             unit_amount = COALESCE($6, unit_amount), \
             unit_amount_minor = COALESCE($7, unit_amount_minor), \
             billing_scheme = COALESCE($8, billing_scheme), \
             recurring = COALESCE($9, recurring), \
             nickname = COALESCE($10, nickname), \
             metadata = COALESCE($11, metadata), \
             stripe_created_at = COALESCE($12, stripe_created_at), \
             updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(entity.id.as_i32())
        .bind(fields.active)
        .bind(fields.is_current)
        .bind(&fields.currency)
        .bind(fields.price_type)
        .bind(fields.unit_amount)
        .bind(fields.unit_amount_minor)
        .bind(&fields.billing_scheme)
        .bind(&fields.recurring)
        .bind(&fields.nickname)
        .bind(&fields.metadata)
        .bind(fields.stripe_created_at)
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn delete(&self, entity: &Price) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE prices SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(entity.id.as_i32())
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn all(&self) -> Result<Vec<Price>, RepositoryError> {
        let rows = sqlx::query_as::<_, PriceRow>(&format!(
            "SELECT {COLUMNS} FROM prices WHERE deleted_at IS NULL ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Price::from).collect())
    }
}
