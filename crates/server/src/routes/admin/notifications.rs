//! Admin notification routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;

use dandeline_core::NotificationId;

use crate::db::NotificationRepository;
use crate::error::AppError;
use crate::models::Notification;
use crate::state::AppState;

/// GET /admin/notifications/unread
#[instrument(skip(state))]
pub async fn unread(State(state): State<AppState>) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = NotificationRepository::new(state.pool()).list_unread().await?;
    Ok(Json(notifications))
}

/// PATCH /admin/notifications/{id}/read
#[instrument(skip(state))]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Notification>, AppError> {
    let notification = NotificationRepository::new(state.pool())
        .mark_read(NotificationId::new(id))
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("notification {id}")))?;
    Ok(Json(notification))
}

/// PATCH /admin/notifications/read-all
#[instrument(skip(state))]
pub async fn mark_all_read(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let updated = NotificationRepository::new(state.pool()).mark_all_read().await?;
    Ok(Json(json!({ "updated": updated })))
}

/// DELETE /admin/notifications/{id}
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    NotificationRepository::new(state.pool())
        .delete(NotificationId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
