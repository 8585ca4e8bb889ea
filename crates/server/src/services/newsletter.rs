//! Newsletter subscriber and template services.

use chrono::Utc;
use sqlx::PgPool;

use dandeline_core::SubscriberStatus;

use crate::db::{
    NewsletterSubscriberRepository, NewsletterTemplateRepository, Repository, RepositoryError,
};
use crate::models::{
    NewNewsletterSubscriber, NewsletterSubscriber, NewsletterTemplate, UpdateNewsletterSubscriber,
};

use super::{EntityService, NoRelation};

/// Domain service for newsletter subscribers.
pub struct NewsletterSubscriberService<'a> {
    gateway: NewsletterSubscriberRepository<'a>,
}

impl<'a> NewsletterSubscriberService<'a> {
    /// Create a new subscriber service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            gateway: NewsletterSubscriberRepository::new(pool),
        }
    }

    /// Subscribe an email address from the storefront.
    ///
    /// An existing subscriber is reactivated instead of duplicated (the
    /// email column is unique); a new one is created as active.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a statement fails.
    pub async fn subscribe(
        &self,
        email: &str,
        source: Option<&str>,
    ) -> Result<NewsletterSubscriber, RepositoryError> {
        if let Some(existing) = self.gateway.find_by_email(email).await? {
            if existing.status == SubscriberStatus::Active {
                return Ok(existing);
            }

            let update = UpdateNewsletterSubscriber {
                status: Some(SubscriberStatus::Active),
                subscribed_at: Some(Utc::now()),
                ..Default::default()
            };
            return self.gateway.update(update, &existing).await;
        }

        self.gateway
            .store(NewNewsletterSubscriber {
                email: email.to_string(),
                first_name: None,
                last_name: None,
                status: SubscriberStatus::Active,
                subscribed_at: Some(Utc::now()),
                source: source.map(str::to_string),
                preferences: None,
                tags: None,
            })
            .await
    }
}

impl<'a> EntityService for NewsletterSubscriberService<'a> {
    type Gateway = NewsletterSubscriberRepository<'a>;
    type Relation = NoRelation;

    fn gateway(&self) -> &Self::Gateway {
        &self.gateway
    }

    fn allowed_relations(&self) -> &'static [NoRelation] {
        &[]
    }

    async fn load_relations(
        &self,
        _entity: &mut NewsletterSubscriber,
        _relations: &[NoRelation],
    ) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn store(
        &self,
        mut input: NewNewsletterSubscriber,
        _relations: Option<&[NoRelation]>,
    ) -> Result<NewsletterSubscriber, RepositoryError> {
        if input.subscribed_at.is_none() && input.status == SubscriberStatus::Active {
            input.subscribed_at = Some(Utc::now());
        }

        self.gateway.store(input).await
    }
}

/// Domain service for newsletter templates.
pub struct NewsletterTemplateService<'a> {
    gateway: NewsletterTemplateRepository<'a>,
}

impl<'a> NewsletterTemplateService<'a> {
    /// Create a new template service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            gateway: NewsletterTemplateRepository::new(pool),
        }
    }
}

impl<'a> EntityService for NewsletterTemplateService<'a> {
    type Gateway = NewsletterTemplateRepository<'a>;
    type Relation = NoRelation;

    fn gateway(&self) -> &Self::Gateway {
        &self.gateway
    }

    fn allowed_relations(&self) -> &'static [NoRelation] {
        &[]
    }

    async fn load_relations(
        &self,
        _entity: &mut NewsletterTemplate,
        _relations: &[NoRelation],
    ) -> Result<(), RepositoryError> {
        Ok(())
    }
}
