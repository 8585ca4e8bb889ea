//! Domain services.
//!
//! Each entity service wraps one repository behind the uniform
//! [`EntityService`] contract and layers on the entity's rules: slug
//! derivation, order-number assignment, lifecycle event emission. The
//! workflow services ([`checkout`], [`catalog`]) orchestrate across
//! several repositories and the Stripe client.
//!
//! # Relations
//!
//! Eager loading is allow-list driven: every service declares which
//! relations may be loaded. A request is intersected against the
//! allow-list (disallowed names silently dropped); requesting `None`
//! loads the service's full default set.

pub mod blog;
pub mod catalog;
pub mod categories;
pub mod checkout;
pub mod email;
pub mod events;
pub mod leads;
pub mod messages;
pub mod newsletter;
pub mod orders;
pub mod products;
pub mod quotes;
pub mod testimonials;

pub use blog::BlogPostService;
pub use catalog::{CatalogImportService, ImportSummary};
pub use categories::CategoryService;
pub use checkout::{CartItem, CheckoutService};
pub use email::EmailService;
pub use events::{DomainEvent, EventDispatcher};
pub use leads::LeadService;
pub use messages::ContactMessageService;
pub use newsletter::{NewsletterSubscriberService, NewsletterTemplateService};
pub use orders::OrderService;
pub use products::ProductService;
pub use quotes::QuoteRequestService;
pub use testimonials::TestimonialService;

use crate::db::{Repository, RepositoryError};

/// Relation type for entities with nothing to eager-load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoRelation {}

/// Intersect requested relations against a service's allow-list.
///
/// `None` means "load everything allowed"; disallowed names are silently
/// dropped rather than rejected.
#[must_use]
pub fn resolve_relations<R: Copy + PartialEq>(requested: Option<&[R]>, allowed: &[R]) -> Vec<R> {
    match requested {
        None => allowed.to_vec(),
        Some(requested) => requested
            .iter()
            .copied()
            .filter(|relation| allowed.contains(relation))
            .collect(),
    }
}

/// Uniform domain-service contract wrapping one [`Repository`].
///
/// Default method bodies delegate straight to the gateway; specializations
/// override `store`/`update` to inject computed fields or emit lifecycle
/// events before/after delegating.
#[allow(async_fn_in_trait)]
pub trait EntityService {
    type Gateway: Repository;
    type Relation: Copy + PartialEq + 'static;

    fn gateway(&self) -> &Self::Gateway;

    /// Relations this service may eager-load. The full list doubles as the
    /// default set.
    fn allowed_relations(&self) -> &'static [Self::Relation];

    /// Load the given relations onto the entity. Called with an already
    /// resolved (intersected) list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a relation query fails.
    async fn load_relations(
        &self,
        entity: &mut <Self::Gateway as Repository>::Entity,
        relations: &[Self::Relation],
    ) -> Result<(), RepositoryError>;

    /// Fetch one entity, with relations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the entity does not exist.
    async fn get_by_id(
        &self,
        id: <Self::Gateway as Repository>::Id,
        relations: Option<&[Self::Relation]>,
    ) -> Result<<Self::Gateway as Repository>::Entity, RepositoryError> {
        let mut entity = self.gateway().find_by_id(id).await?;
        let resolved = resolve_relations(relations, self.allowed_relations());
        self.load_relations(&mut entity, &resolved).await?;
        Ok(entity)
    }

    /// Create an entity, returning it with relations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the insert or a relation query fails.
    async fn store(
        &self,
        input: <Self::Gateway as Repository>::NewEntity,
        relations: Option<&[Self::Relation]>,
    ) -> Result<<Self::Gateway as Repository>::Entity, RepositoryError> {
        let mut entity = self.gateway().store(input).await?;
        let resolved = resolve_relations(relations, self.allowed_relations());
        self.load_relations(&mut entity, &resolved).await?;
        Ok(entity)
    }

    /// Apply a partial update, returning the refreshed entity with
    /// relations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the update or a relation query fails.
    async fn update(
        &self,
        input: <Self::Gateway as Repository>::UpdateEntity,
        entity: &<Self::Gateway as Repository>::Entity,
        relations: Option<&[Self::Relation]>,
    ) -> Result<<Self::Gateway as Repository>::Entity, RepositoryError> {
        let mut updated = self.gateway().update(input, entity).await?;
        let resolved = resolve_relations(relations, self.allowed_relations());
        self.load_relations(&mut updated, &resolved).await?;
        Ok(updated)
    }

    /// Delete (or tombstone) the entity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the statement fails.
    async fn delete(
        &self,
        entity: &<Self::Gateway as Repository>::Entity,
    ) -> Result<bool, RepositoryError> {
        self.gateway().delete(entity).await
    }

    /// List all entities (no relations).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn get_all(
        &self,
    ) -> Result<Vec<<Self::Gateway as Repository>::Entity>, RepositoryError> {
        self.gateway().all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Rel {
        A,
        B,
        C,
    }

    #[test]
    fn test_none_loads_full_default_set() {
        let resolved = resolve_relations(None, &[Rel::A, Rel::B]);
        assert_eq!(resolved, vec![Rel::A, Rel::B]);
    }

    #[test]
    fn test_request_is_intersected() {
        let resolved = resolve_relations(Some(&[Rel::B, Rel::C]), &[Rel::A, Rel::B]);
        assert_eq!(resolved, vec![Rel::B]);
    }

    #[test]
    fn test_disallowed_names_silently_dropped() {
        let resolved = resolve_relations(Some(&[Rel::C]), &[Rel::A, Rel::B]);
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_empty_request_loads_nothing() {
        let resolved = resolve_relations(Some(&[]), &[Rel::A, Rel::B]);
        assert!(resolved.is_empty());
    }
}
