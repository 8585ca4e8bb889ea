//! Admin dashboard counts.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::db::{
    ContactMessageRepository, LeadRepository, NewsletterSubscriberRepository,
    NotificationRepository, OrderRepository, ProductRepository, QuoteRequestRepository,
};
use crate::error::AppError;
use crate::models::Notification;
use crate::state::AppState;

/// Dashboard summary payload.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub orders: i64,
    pub products: i64,
    pub leads: i64,
    pub quote_requests: i64,
    pub unread_messages: i64,
    pub active_subscribers: i64,
    pub unread_notifications: Vec<Notification>,
}

/// Dashboard counts and recent notifications.
///
/// GET /admin
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<DashboardSummary>, AppError> {
    let pool = state.pool();

    let summary = DashboardSummary {
        orders: OrderRepository::new(pool).count().await?,
        products: ProductRepository::new(pool).count().await?,
        leads: LeadRepository::new(pool).count().await?,
        quote_requests: QuoteRequestRepository::new(pool).count().await?,
        unread_messages: ContactMessageRepository::new(pool).count_unread().await?,
        active_subscribers: NewsletterSubscriberRepository::new(pool).count_active().await?,
        unread_notifications: NotificationRepository::new(pool).list_unread().await?,
    };

    Ok(Json(summary))
}
