//! Testimonial service.

use sqlx::PgPool;

use crate::db::{Repository, RepositoryError, TestimonialRepository};
use crate::models::Testimonial;

use super::{EntityService, NoRelation};

/// Domain service for testimonials.
pub struct TestimonialService<'a> {
    gateway: TestimonialRepository<'a>,
}

impl<'a> TestimonialService<'a> {
    /// Create a new testimonial service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            gateway: TestimonialRepository::new(pool),
        }
    }
}

impl<'a> EntityService for TestimonialService<'a> {
    type Gateway = TestimonialRepository<'a>;
    type Relation = NoRelation;

    fn gateway(&self) -> &Self::Gateway {
        &self.gateway
    }

    fn allowed_relations(&self) -> &'static [NoRelation] {
        &[]
    }

    async fn load_relations(
        &self,
        _entity: &mut Testimonial,
        _relations: &[NoRelation],
    ) -> Result<(), RepositoryError> {
        Ok(())
    }
}
