//! Admin newsletter routes (subscribers + templates).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use dandeline_core::{NewsletterSubscriberId, NewsletterTemplateId};

use crate::error::AppError;
use crate::models::{
    NewNewsletterSubscriber, NewNewsletterTemplate, NewsletterSubscriber, NewsletterTemplate,
    UpdateNewsletterSubscriber, UpdateNewsletterTemplate,
};
use crate::services::{EntityService, NewsletterSubscriberService, NewsletterTemplateService};
use crate::state::AppState;

// =============================================================================
// Subscribers
// =============================================================================

/// GET /admin/newsletter/subscribers
#[instrument(skip(state))]
pub async fn subscribers_index(
    State(state): State<AppState>,
) -> Result<Json<Vec<NewsletterSubscriber>>, AppError> {
    let service = NewsletterSubscriberService::new(state.pool());
    Ok(Json(service.get_all().await?))
}

/// POST /admin/newsletter/subscribers
#[instrument(skip(state, input))]
pub async fn subscribers_store(
    State(state): State<AppState>,
    Json(input): Json<NewNewsletterSubscriber>,
) -> Result<(StatusCode, Json<NewsletterSubscriber>), AppError> {
    let service = NewsletterSubscriberService::new(state.pool());
    let subscriber = service.store(input, None).await?;
    Ok((StatusCode::CREATED, Json(subscriber)))
}

/// PATCH /admin/newsletter/subscribers/{id}
#[instrument(skip(state, input))]
pub async fn subscribers_update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateNewsletterSubscriber>,
) -> Result<Json<NewsletterSubscriber>, AppError> {
    let service = NewsletterSubscriberService::new(state.pool());
    let subscriber = service
        .get_by_id(NewsletterSubscriberId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("subscriber {id}")))?;
    let updated = service.update(input, &subscriber, None).await?;
    Ok(Json(updated))
}

/// DELETE /admin/newsletter/subscribers/{id}
#[instrument(skip(state))]
pub async fn subscribers_destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let service = NewsletterSubscriberService::new(state.pool());
    let subscriber = service
        .get_by_id(NewsletterSubscriberId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("subscriber {id}")))?;
    service.delete(&subscriber).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Templates
// =============================================================================

/// GET /admin/newsletter/templates
#[instrument(skip(state))]
pub async fn templates_index(
    State(state): State<AppState>,
) -> Result<Json<Vec<NewsletterTemplate>>, AppError> {
    let service = NewsletterTemplateService::new(state.pool());
    Ok(Json(service.get_all().await?))
}

/// POST /admin/newsletter/templates
#[instrument(skip(state, input))]
pub async fn templates_store(
    State(state): State<AppState>,
    Json(input): Json<NewNewsletterTemplate>,
) -> Result<(StatusCode, Json<NewsletterTemplate>), AppError> {
    let service = NewsletterTemplateService::new(state.pool());
    let template = service.store(input, None).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /admin/newsletter/templates/{id}
#[instrument(skip(state))]
pub async fn templates_show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<NewsletterTemplate>, AppError> {
    let service = NewsletterTemplateService::new(state.pool());
    let template = service
        .get_by_id(NewsletterTemplateId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("template {id}")))?;
    Ok(Json(template))
}

/// PATCH /admin/newsletter/templates/{id}
#[instrument(skip(state, input))]
pub async fn templates_update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateNewsletterTemplate>,
) -> Result<Json<NewsletterTemplate>, AppError> {
    let service = NewsletterTemplateService::new(state.pool());
    let template = service
        .get_by_id(NewsletterTemplateId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("template {id}")))?;
    let updated = service.update(input, &template, None).await?;
    Ok(Json(updated))
}

/// DELETE /admin/newsletter/templates/{id}
#[instrument(skip(state))]
pub async fn templates_destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let service = NewsletterTemplateService::new(state.pool());
    let template = service
        .get_by_id(NewsletterTemplateId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("template {id}")))?;
    service.delete(&template).await?;
    Ok(StatusCode::NO_CONTENT)
}
