//! Blog post service.

use chrono::Utc;
use sqlx::PgPool;

use dandeline_core::{BlogPostId, slugify, with_suffix};

use crate::db::{BlogPostRepository, Repository, RepositoryError};
use crate::models::{BlogPost, NewBlogPost, UpdateBlogPost};

use super::{EntityService, NoRelation};

/// Domain service for blog posts.
///
/// Derives slugs from the title (with numeric-suffix disambiguation) and
/// stamps `published_at` on first publish.
pub struct BlogPostService<'a> {
    gateway: BlogPostRepository<'a>,
}

impl<'a> BlogPostService<'a> {
    /// Create a new blog post service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            gateway: BlogPostRepository::new(pool),
        }
    }

    /// Resolve a base slug to one no other post uses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the uniqueness probe fails.
    pub async fn ensure_unique_slug(
        &self,
        base: &str,
        exclude: Option<BlogPostId>,
    ) -> Result<String, RepositoryError> {
        let mut slug = base.to_string();
        let mut suffix = 2;

        while self.gateway.slug_exists(&slug, exclude).await? {
            slug = with_suffix(base, suffix);
            suffix += 1;
        }

        Ok(slug)
    }
}

impl<'a> EntityService for BlogPostService<'a> {
    type Gateway = BlogPostRepository<'a>;
    type Relation = NoRelation;

    fn gateway(&self) -> &Self::Gateway {
        &self.gateway
    }

    fn allowed_relations(&self) -> &'static [NoRelation] {
        &[]
    }

    async fn load_relations(
        &self,
        _entity: &mut BlogPost,
        _relations: &[NoRelation],
    ) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn store(
        &self,
        mut input: NewBlogPost,
        _relations: Option<&[NoRelation]>,
    ) -> Result<BlogPost, RepositoryError> {
        let base = match input.slug.take() {
            Some(slug) if !slug.is_empty() => slug,
            _ => slugify(&input.title),
        };
        input.slug = Some(self.ensure_unique_slug(&base, None).await?);

        if input.is_published && input.published_at.is_none() {
            input.published_at = Some(Utc::now());
        }

        self.gateway.store(input).await
    }

    async fn update(
        &self,
        mut input: UpdateBlogPost,
        entity: &BlogPost,
        _relations: Option<&[NoRelation]>,
    ) -> Result<BlogPost, RepositoryError> {
        if input.slug.is_none() {
            if let Some(title) = &input.title {
                let derived = slugify(title);
                if derived != entity.slug {
                    input.slug = Some(self.ensure_unique_slug(&derived, Some(entity.id)).await?);
                }
            }
        }

        // First publish stamps the timestamp
        if input.is_published == Some(true)
            && entity.published_at.is_none()
            && input.published_at.is_none()
        {
            input.published_at = Some(Utc::now());
        }

        self.gateway.update(input, entity).await
    }
}
