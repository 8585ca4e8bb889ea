//! Blog post repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dandeline_core::BlogPostId;

use super::{Repository, RepositoryError, not_found};
use crate::models::{BlogPost, NewBlogPost, UpdateBlogPost};

const COLUMNS: &str =
    "id, title, slug, content, excerpt, is_published, published_at, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct BlogPostRow {
    id: i32,
    title: String,
    slug: String,
    content: String,
    excerpt: Option<String>,
    is_published: bool,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BlogPostRow> for BlogPost {
    fn from(row: BlogPostRow) -> Self {
        Self {
            id: BlogPostId::new(row.id),
            title: row.title,
            slug: row.slug,
            content: row.content,
            excerpt: row.excerpt,
            is_published: row.is_published,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for blog post database operations.
pub struct BlogPostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BlogPostRepository<'a> {
    /// Create a new blog post repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a post by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, RepositoryError> {
        let row = sqlx::query_as::<_, BlogPostRow>(&format!(
            "SELECT {COLUMNS} FROM blog_posts WHERE slug = $1 AND deleted_at IS NULL"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(BlogPost::from))
    }

    /// Whether a slug is already taken by a different post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn slug_exists(
        &self,
        slug: &str,
        exclude: Option<BlogPostId>,
    ) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM blog_posts \
             WHERE slug = $1 AND deleted_at IS NULL AND ($2::int IS NULL OR id <> $2)",
        )
        .bind(slug)
        .bind(exclude.map(|id| id.as_i32()))
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    /// List published posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_published(&self) -> Result<Vec<BlogPost>, RepositoryError> {
        let rows = sqlx::query_as::<_, BlogPostRow>(&format!(
            "SELECT {COLUMNS} FROM blog_posts \
             WHERE is_published = TRUE AND deleted_at IS NULL \
             ORDER BY published_at DESC NULLS LAST, created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(BlogPost::from).collect())
    }
}

impl Repository for BlogPostRepository<'_> {
    type Id = BlogPostId;
    type Entity = BlogPost;
    type NewEntity = NewBlogPost;
    type UpdateEntity = UpdateBlogPost;

    async fn find_by_id(&self, id: BlogPostId) -> Result<BlogPost, RepositoryError> {
        let row = sqlx::query_as::<_, BlogPostRow>(&format!(
            "SELECT {COLUMNS} FROM blog_posts WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn store(&self, fields: NewBlogPost) -> Result<BlogPost, RepositoryError> {
        let row = sqlx::query_as::<_, BlogPostRow>(&format!(
            "INSERT INTO blog_posts (title, slug, content, excerpt, is_published, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        ))
        .bind(&fields.title)
        .bind(fields.slug.as_deref().unwrap_or_default())
        .bind(&fields.content)
        .bind(&fields.excerpt)
        .bind(fields.is_published)
        .bind(fields.published_at)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        fields: UpdateBlogPost,
        entity: &BlogPost,
    ) -> Result<BlogPost, RepositoryError> {
        let row = sqlx::query_as::<_, BlogPostRow>(&format!(
            "UPDATE blog_posts SET \
             title = COALESCE($2, title), \
             slug = COALESCE($3, slug), \
             content = COALESCE($4, content), \
             excerpt = COALESCE($5, excerpt), \
             is_published = COALESCE($6, is_published), \
             published_at = COALESCE($7, published_at), \
             updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(entity.id.as_i32())
        .bind(&fields.title)
        .bind(&fields.slug)
        .bind(&fields.content)
        .bind(&fields.excerpt)
        .bind(fields.is_published)
        .bind(fields.published_at)
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn delete(&self, entity: &BlogPost) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE blog_posts SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(entity.id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn all(&self) -> Result<Vec<BlogPost>, RepositoryError> {
        let rows = sqlx::query_as::<_, BlogPostRow>(&format!(
            "SELECT {COLUMNS} FROM blog_posts WHERE deleted_at IS NULL ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(BlogPost::from).collect())
    }
}
