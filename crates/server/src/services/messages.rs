//! Contact message service.

use sqlx::PgPool;

use crate::db::{ContactMessageRepository, Repository, RepositoryError};
use crate::models::{ContactMessage, NewContactMessage};

use super::events::{DomainEvent, EventDispatcher};
use super::{EntityService, NoRelation};

/// Domain service for contact messages. A new submission raises an in-app
/// notification and queues a confirmation email to the sender.
pub struct ContactMessageService<'a> {
    gateway: ContactMessageRepository<'a>,
    dispatcher: &'a EventDispatcher,
}

impl<'a> ContactMessageService<'a> {
    /// Create a new contact message service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, dispatcher: &'a EventDispatcher) -> Self {
        Self {
            gateway: ContactMessageRepository::new(pool),
            dispatcher,
        }
    }
}

impl<'a> EntityService for ContactMessageService<'a> {
    type Gateway = ContactMessageRepository<'a>;
    type Relation = NoRelation;

    fn gateway(&self) -> &Self::Gateway {
        &self.gateway
    }

    fn allowed_relations(&self) -> &'static [NoRelation] {
        &[]
    }

    async fn load_relations(
        &self,
        _entity: &mut ContactMessage,
        _relations: &[NoRelation],
    ) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn store(
        &self,
        input: NewContactMessage,
        _relations: Option<&[NoRelation]>,
    ) -> Result<ContactMessage, RepositoryError> {
        let entity = self.gateway.store(input).await?;

        self.dispatcher
            .dispatch(DomainEvent::ContactMessageCreated {
                message: entity.clone(),
            })
            .await;

        Ok(entity)
    }
}
