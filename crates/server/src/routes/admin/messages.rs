//! Admin contact message routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use dandeline_core::ContactMessageId;

use crate::error::AppError;
use crate::models::{ContactMessage, UpdateContactMessage};
use crate::services::{ContactMessageService, EntityService};
use crate::state::AppState;

/// GET /admin/messages
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ContactMessage>>, AppError> {
    let service = ContactMessageService::new(state.pool(), state.dispatcher());
    Ok(Json(service.get_all().await?))
}

/// PATCH /admin/messages/{id}
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateContactMessage>,
) -> Result<Json<ContactMessage>, AppError> {
    let service = ContactMessageService::new(state.pool(), state.dispatcher());
    let message = service
        .get_by_id(ContactMessageId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("message {id}")))?;
    let updated = service.update(input, &message, None).await?;
    Ok(Json(updated))
}

/// DELETE /admin/messages/{id}
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let service = ContactMessageService::new(state.pool(), state.dispatcher());
    let message = service
        .get_by_id(ContactMessageId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("message {id}")))?;
    service.delete(&message).await?;
    Ok(StatusCode::NO_CONTENT)
}
