//! Lead service.

use sqlx::PgPool;

use crate::db::{LeadRepository, Repository, RepositoryError};
use crate::models::{Lead, UpdateLead};

use super::events::{DomainEvent, EventDispatcher};
use super::{EntityService, NoRelation};

/// Domain service for leads. Status changes raise an in-app notification.
pub struct LeadService<'a> {
    gateway: LeadRepository<'a>,
    dispatcher: &'a EventDispatcher,
}

impl<'a> LeadService<'a> {
    /// Create a new lead service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, dispatcher: &'a EventDispatcher) -> Self {
        Self {
            gateway: LeadRepository::new(pool),
            dispatcher,
        }
    }
}

impl<'a> EntityService for LeadService<'a> {
    type Gateway = LeadRepository<'a>;
    type Relation = NoRelation;

    fn gateway(&self) -> &Self::Gateway {
        &self.gateway
    }

    fn allowed_relations(&self) -> &'static [NoRelation] {
        &[]
    }

    async fn load_relations(
        &self,
        _entity: &mut Lead,
        _relations: &[NoRelation],
    ) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn update(
        &self,
        input: UpdateLead,
        entity: &Lead,
        _relations: Option<&[NoRelation]>,
    ) -> Result<Lead, RepositoryError> {
        let previous_status = entity.status;
        let updated = self.gateway.update(input, entity).await?;

        if updated.status != previous_status {
            self.dispatcher
                .dispatch(DomainEvent::LeadStatusChanged {
                    lead: updated.clone(),
                    previous: previous_status,
                })
                .await;
        }

        Ok(updated)
    }
}
