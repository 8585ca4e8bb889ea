//! Category repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dandeline_core::CategoryId;

use super::{Repository, RepositoryError, not_found};
use crate::models::{Category, NewCategory, UpdateCategory};

const COLUMNS: &str =
    "id, name, slug, description, is_active, sort_order, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    slug: String,
    description: Option<String>,
    is_active: bool,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
            is_active: row.is_active,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
            products: None,
        }
    }
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a category by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE slug = $1 AND deleted_at IS NULL"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    /// Find a category by slug, creating it when absent.
    ///
    /// Used for the sentinel import category. The read-then-write is not
    /// raced against concurrent imports (documented gap).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either statement fails.
    pub async fn find_or_create_by_slug(
        &self,
        fields: NewCategory,
    ) -> Result<Category, RepositoryError> {
        let slug = fields
            .slug
            .clone()
            .ok_or_else(|| RepositoryError::DataCorruption("slug not assigned".into()))?;

        if let Some(existing) = self.find_by_slug(&slug).await? {
            return Ok(existing);
        }

        self.store(fields).await
    }

    /// List active categories ordered for display.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {COLUMNS} FROM categories \
             WHERE is_active = TRUE AND deleted_at IS NULL ORDER BY sort_order, name"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }
}

impl Repository for CategoryRepository<'_> {
    type Id = CategoryId;
    type Entity = Category;
    type NewEntity = NewCategory;
    type UpdateEntity = UpdateCategory;

    async fn find_by_id(&self, id: CategoryId) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn store(&self, fields: NewCategory) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "INSERT INTO categories (name, slug, description, is_active, sort_order) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .bind(&fields.name)
        .bind(fields.slug.as_deref().unwrap_or_default())
        .bind(&fields.description)
        .bind(fields.is_active)
        .bind(fields.sort_order)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        fields: UpdateCategory,
        entity: &Category,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "UPDATE categories SET \
             name = COALESCE($2, name), \
             slug = COALESCE($3, slug), \
             description = COALESCE($4, description), \
             is_active = COALESCE($5, is_active), \
             sort_order = COALESCE($6, sort_order), \
             updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(entity.id.as_i32())
        .bind(&fields.name)
        .bind(&fields.slug)
        .bind(&fields.description)
        .bind(fields.is_active)
        .bind(fields.sort_order)
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn delete(&self, entity: &Category) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE categories SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(entity.id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE deleted_at IS NULL ORDER BY sort_order, name"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }
}
