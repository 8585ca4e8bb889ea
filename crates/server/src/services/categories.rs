//! Category service.

use sqlx::PgPool;

use dandeline_core::slugify;

use crate::db::{CategoryRepository, ProductRepository, Repository, RepositoryError};
use crate::models::{Category, CategoryRelation, NewCategory, UpdateCategory};

use super::{EntityService, resolve_relations};

const ALLOWED_RELATIONS: &[CategoryRelation] = &[CategoryRelation::Products];

/// Domain service for categories.
pub struct CategoryService<'a> {
    gateway: CategoryRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            gateway: CategoryRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }
}

impl<'a> EntityService for CategoryService<'a> {
    type Gateway = CategoryRepository<'a>;
    type Relation = CategoryRelation;

    fn gateway(&self) -> &Self::Gateway {
        &self.gateway
    }

    fn allowed_relations(&self) -> &'static [CategoryRelation] {
        ALLOWED_RELATIONS
    }

    async fn load_relations(
        &self,
        entity: &mut Category,
        relations: &[CategoryRelation],
    ) -> Result<(), RepositoryError> {
        for relation in relations {
            match relation {
                CategoryRelation::Products => {
                    entity.products = Some(self.products.list_for_category(entity.id).await?);
                }
            }
        }

        Ok(())
    }

    async fn store(
        &self,
        mut input: NewCategory,
        relations: Option<&[CategoryRelation]>,
    ) -> Result<Category, RepositoryError> {
        if input.slug.as_deref().is_none_or(str::is_empty) {
            input.slug = Some(slugify(&input.name));
        }

        let mut entity = self.gateway.store(input).await?;
        let resolved = resolve_relations(relations, self.allowed_relations());
        self.load_relations(&mut entity, &resolved).await?;
        Ok(entity)
    }

    async fn update(
        &self,
        mut input: UpdateCategory,
        entity: &Category,
        relations: Option<&[CategoryRelation]>,
    ) -> Result<Category, RepositoryError> {
        if input.slug.is_none() {
            if let Some(name) = &input.name {
                let derived = slugify(name);
                if derived != entity.slug {
                    input.slug = Some(derived);
                }
            }
        }

        let mut updated = self.gateway.update(input, entity).await?;
        let resolved = resolve_relations(relations, self.allowed_relations());
        self.load_relations(&mut updated, &resolved).await?;
        Ok(updated)
    }
}
