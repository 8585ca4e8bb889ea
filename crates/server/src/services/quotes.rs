//! Quote request service.

use sqlx::PgPool;

use crate::db::{QuoteRequestRepository, Repository, RepositoryError};
use crate::models::{NewQuoteRequest, QuoteRequest};

use super::events::{DomainEvent, EventDispatcher};
use super::{EntityService, NoRelation};

/// Domain service for quote requests. A new submission raises an in-app
/// notification and queues a confirmation email to the submitter.
pub struct QuoteRequestService<'a> {
    gateway: QuoteRequestRepository<'a>,
    dispatcher: &'a EventDispatcher,
}

impl<'a> QuoteRequestService<'a> {
    /// Create a new quote request service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, dispatcher: &'a EventDispatcher) -> Self {
        Self {
            gateway: QuoteRequestRepository::new(pool),
            dispatcher,
        }
    }
}

impl<'a> EntityService for QuoteRequestService<'a> {
    type Gateway = QuoteRequestRepository<'a>;
    type Relation = NoRelation;

    fn gateway(&self) -> &Self::Gateway {
        &self.gateway
    }

    fn allowed_relations(&self) -> &'static [NoRelation] {
        &[]
    }

    async fn load_relations(
        &self,
        _entity: &mut QuoteRequest,
        _relations: &[NoRelation],
    ) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn store(
        &self,
        input: NewQuoteRequest,
        _relations: Option<&[NoRelation]>,
    ) -> Result<QuoteRequest, RepositoryError> {
        let entity = self.gateway.store(input).await?;

        self.dispatcher
            .dispatch(DomainEvent::QuoteRequestCreated {
                quote: entity.clone(),
            })
            .await;

        Ok(entity)
    }
}
