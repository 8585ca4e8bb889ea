//! Testimonial repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dandeline_core::TestimonialId;

use super::{Repository, RepositoryError, not_found};
use crate::models::{NewTestimonial, Testimonial, UpdateTestimonial};

const COLUMNS: &str = "id, name, title, quote, is_featured, is_active, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct TestimonialRow {
    id: i32,
    name: String,
    title: Option<String>,
    quote: String,
    is_featured: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TestimonialRow> for Testimonial {
    fn from(row: TestimonialRow) -> Self {
        Self {
            id: TestimonialId::new(row.id),
            name: row.name,
            title: row.title,
            quote: row.quote,
            is_featured: row.is_featured,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for testimonial database operations.
pub struct TestimonialRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TestimonialRepository<'a> {
    /// Create a new testimonial repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active testimonials, featured first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Testimonial>, RepositoryError> {
        let rows = sqlx::query_as::<_, TestimonialRow>(&format!(
            "SELECT {COLUMNS} FROM testimonials \
             WHERE is_active = TRUE AND deleted_at IS NULL \
             ORDER BY is_featured DESC, created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Testimonial::from).collect())
    }
}

impl Repository for TestimonialRepository<'_> {
    type Id = TestimonialId;
    type Entity = Testimonial;
    type NewEntity = NewTestimonial;
    type UpdateEntity = UpdateTestimonial;

    async fn find_by_id(&self, id: TestimonialId) -> Result<Testimonial, RepositoryError> {
        let row = sqlx::query_as::<_, TestimonialRow>(&format!(
            "SELECT {COLUMNS} FROM testimonials WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn store(&self, fields: NewTestimonial) -> Result<Testimonial, RepositoryError> {
        let row = sqlx::query_as::<_, TestimonialRow>(&format!(
            "INSERT INTO testimonials (name, title, quote, is_featured, is_active) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .bind(&fields.name)
        .bind(&fields.title)
        .bind(&fields.quote)
        .bind(fields.is_featured)
        .bind(fields.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        fields: UpdateTestimonial,
        entity: &Testimonial,
    ) -> Result<Testimonial, RepositoryError> {
        let row = sqlx::query_as::<_, TestimonialRow>(&format!(
            "UPDATE testimonials SET \
             name = COALESCE($2, name), \
             title = COALESCE($3, title), \
             quote = COALESCE($4, quote), \
             is_featured = COALESCE($5, is_featured), \
             is_active = COALESCE($6, is_active), \
             updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(entity.id.as_i32())
        .bind(&fields.name)
        .bind(&fields.title)
        .bind(&fields.quote)
        .bind(fields.is_featured)
        .bind(fields.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn delete(&self, entity: &Testimonial) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE testimonials SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(entity.id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn all(&self) -> Result<Vec<Testimonial>, RepositoryError> {
        let rows = sqlx::query_as::<_, TestimonialRow>(&format!(
            "SELECT {COLUMNS} FROM testimonials WHERE deleted_at IS NULL ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Testimonial::from).collect())
    }
}
