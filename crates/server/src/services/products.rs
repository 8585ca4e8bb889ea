//! Product service.

use sqlx::PgPool;

use dandeline_core::{ProductId, slugify, with_suffix};

use crate::db::{
    CategoryRepository, LineItemRepository, PriceRepository, ProductRepository, Repository,
    RepositoryError,
};
use crate::models::{NewProduct, Product, ProductRelation, UpdateProduct};

use super::{EntityService, resolve_relations};

const ALLOWED_RELATIONS: &[ProductRelation] = &[
    ProductRelation::Category,
    ProductRelation::Prices,
    ProductRelation::LineItems,
];

/// Domain service for products.
///
/// Derives slugs from the product name, disambiguating collisions with an
/// incrementing numeric suffix.
pub struct ProductService<'a> {
    gateway: ProductRepository<'a>,
    categories: CategoryRepository<'a>,
    prices: PriceRepository<'a>,
    line_items: LineItemRepository<'a>,
}

impl<'a> ProductService<'a> {
    /// Create a new product service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            gateway: ProductRepository::new(pool),
            categories: CategoryRepository::new(pool),
            prices: PriceRepository::new(pool),
            line_items: LineItemRepository::new(pool),
        }
    }

    /// Resolve a base slug to one no other product uses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the uniqueness probe fails.
    pub async fn ensure_unique_slug(
        &self,
        base: &str,
        exclude: Option<ProductId>,
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

impl<'a> EntityService for ProductService<'a> {
    type Gateway = ProductRepository<'a>;
    type Relation = ProductRelation;

    fn gateway(&self) -> &Self::Gateway {
        &self.gateway
    }

    fn allowed_relations(&self) -> &'static [ProductRelation] {
        ALLOWED_RELATIONS
    }

    async fn load_relations(
        &self,
        entity: &mut Product,
        relations: &[ProductRelation],
    ) -> Result<(), RepositoryError> {
        for relation in relations {
            match relation {
                ProductRelation::Category => {
                    entity.category = match self.categories.find_by_id(entity.category_id).await {
                        Ok(category) => Some(category),
                        Err(RepositoryError::NotFound) => None,
                        Err(e) => return Err(e),
                    };
                }
                ProductRelation::Prices => {
                    entity.prices = Some(self.prices.list_for_product(entity.id).await?);
                }
                ProductRelation::LineItems => {
                    entity.line_items = Some(self.line_items.list_for_product(entity.id).await?);
                }
            }
        }

        Ok(())
    }

    async fn store(
        &self,
        mut input: NewProduct,
        relations: Option<&[ProductRelation]>,
    ) -> Result<Product, RepositoryError> {
        let base = match input.slug.take() {
            Some(slug) if !slug.is_empty() => slug,
            _ => slugify(&input.name),
        };
        input.slug = Some(self.ensure_unique_slug(&base, None).await?);

        let mut entity = self.gateway.store(input).await?;
        let resolved = resolve_relations(relations, self.allowed_relations());
        self.load_relations(&mut entity, &resolved).await?;
        Ok(entity)
    }

    async fn update(
        &self,
        mut input: UpdateProduct,
        entity: &Product,
        relations: Option<&[ProductRelation]>,
    ) -> Result<Product, RepositoryError> {
        // A renamed product gets a re-derived slug unless the caller set
        // one explicitly; an unchanged derivation keeps the existing slug.
        if input.slug.is_none() {
            if let Some(name) = &input.name {
                let derived = slugify(name);
                if derived != entity.slug {
                    input.slug = Some(self.ensure_unique_slug(&derived, Some(entity.id)).await?);
                }
            }
        }

        let mut updated = self.gateway.update(input, entity).await?;
        let resolved = resolve_relations(relations, self.allowed_relations());
        self.load_relations(&mut updated, &resolved).await?;
        Ok(updated)
    }
}
