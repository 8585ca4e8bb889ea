//! Product repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use dandeline_core::{CategoryId, ProductId};

use super::{Repository, RepositoryError, not_found};
use crate::models::{NewProduct, Product, UpdateProduct};

const COLUMNS: &str = "id, stripe_product_id, category_id, name, slug, description, sku, \
     image_url, images, package_dimensions, weight, shippable, tax_code, metadata, \
     unit_label, is_active, is_featured, created_at, updated_at";

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    stripe_product_id: Option<String>,
    category_id: i32,
    name: String,
    slug: String,
    description: String,
    sku: Option<String>,
    image_url: Option<String>,
    images: Option<Json<Vec<String>>>,
    package_dimensions: Option<String>,
    weight: Option<Decimal>,
    shippable: bool,
    tax_code: Option<String>,
    metadata: Option<serde_json::Value>,
    unit_label: Option<String>,
    is_active: bool,
    is_featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            stripe_product_id: row.stripe_product_id,
            category_id: CategoryId::new(row.category_id),
            name: row.name,
            slug: row.slug,
            description: row.description,
            sku: row.sku,
            image_url: row.image_url,
            images: row.images.map(|Json(images)| images),
            package_dimensions: row.package_dimensions,
            weight: row.weight,
            shippable: row.shippable,
            tax_code: row.tax_code,
            metadata: row.metadata,
            unit_label: row.unit_label,
            is_active: row.is_active,
            is_featured: row.is_featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
            category: None,
            prices: None,
            line_items: None,
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a product by its Stripe catalog id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_stripe_id(
        &self,
        stripe_product_id: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM products WHERE stripe_product_id = $1 AND deleted_at IS NULL"
        ))
        .bind(stripe_product_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Find a product by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM products WHERE slug = $1 AND deleted_at IS NULL"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Whether a slug is already taken by a different product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn slug_exists(
        &self,
        slug: &str,
        exclude: Option<ProductId>,
    ) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products \
             WHERE slug = $1 AND deleted_at IS NULL AND ($2::int IS NULL OR id <> $2)",
        )
        .bind(slug)
        .bind(exclude.map(|id| id.as_i32()))
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    /// List active products for the storefront, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM products \
             WHERE is_active = TRUE AND deleted_at IS NULL ORDER BY name"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// List a category's products, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM products \
             WHERE category_id = $1 AND deleted_at IS NULL ORDER BY name"
        ))
        .bind(category_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Live product count (admin dashboard).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE deleted_at IS NULL")
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }
}

impl Repository for ProductRepository<'_> {
    type Id = ProductId;
    type Entity = Product;
    type NewEntity = NewProduct;
    type UpdateEntity = UpdateProduct;

    async fn find_by_id(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM products WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn store(&self, fields: NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (stripe_product_id, category_id, name, slug, description, \
             sku, image_url, images, package_dimensions, weight, shippable, tax_code, \
             metadata, unit_label, is_active, is_featured) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {COLUMNS}"
        ))
        .bind(&fields.stripe_product_id)
        .bind(fields.category_id.as_i32())
        .bind(&fields.name)
        .bind(fields.slug.as_deref().unwrap_or_default())
        .bind(&fields.description)
        .bind(&fields.sku)
        .bind(&fields.image_url)
        .bind(fields.images.map(Json))
        .bind(&fields.package_dimensions)
        .bind(fields.weight)
        .bind(fields.shippable)
        .bind(&fields.tax_code)
        .bind(&fields.metadata)
        .bind(&fields.unit_label)
        .bind(fields.is_active)
        .bind(fields.is_featured)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        fields: UpdateProduct,
        entity: &Product,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET \
             stripe_product_id = COALESCE($2, stripe_product_id), \
             category_id = COALESCE($3, category_id), \
             name = COALESCE($4, name), \
             slug = COALESCE($5, slug), \
             description = COALESCE($6, description), \
             sku = COALESCE($7, sku), \
             image_url = COALESCE($8, image_url), \
             images = COALESCE($9, images), \
             package_dimensions = COALESCE($10, package_dimensions), \
             weight = COALESCE($11, weight), \
             shippable = COALESCE($12, shippable), \
             tax_code = COALESCE($13, tax_code), \
             metadata = COALESCE($14, metadata), \
             unit_label = COALESCE($15, unit_label), \
             is_active = COALESCE($16, is_active), \
             is_featured = COALESCE($17, is_featured), \
             updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(entity.id.as_i32())
        .bind(&fields.stripe_product_id)
        .bind(fields.category_id.map(|id| id.as_i32()))
        .bind(&fields.name)
        .bind(&fields.slug)
        .bind(&fields.description)
        .bind(&fields.sku)
        .bind(&fields.image_url)
        .bind(fields.images.map(Json))
        .bind(&fields.package_dimensions)
        .bind(fields.weight)
        .bind(fields.shippable)
        .bind(&fields.tax_code)
        .bind(&fields.metadata)
        .bind(&fields.unit_label)
        .bind(fields.is_active)
        .bind(fields.is_featured)
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn delete(&self, entity: &Product) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(entity.id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM products WHERE deleted_at IS NULL ORDER BY name"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }
}
