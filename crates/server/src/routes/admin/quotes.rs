//! Admin quote request routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use dandeline_core::QuoteRequestId;

use crate::error::AppError;
use crate::models::{QuoteRequest, UpdateQuoteRequest};
use crate::services::{EntityService, QuoteRequestService};
use crate::state::AppState;

/// GET /admin/quotes
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<QuoteRequest>>, AppError> {
    let service = QuoteRequestService::new(state.pool(), state.dispatcher());
    Ok(Json(service.get_all().await?))
}

/// PATCH /admin/quotes/{id}
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateQuoteRequest>,
) -> Result<Json<QuoteRequest>, AppError> {
    let service = QuoteRequestService::new(state.pool(), state.dispatcher());
    let quote = service
        .get_by_id(QuoteRequestId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("quote request {id}")))?;
    let updated = service.update(input, &quote, None).await?;
    Ok(Json(updated))
}

/// DELETE /admin/quotes/{id}
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let service = QuoteRequestService::new(state.pool(), state.dispatcher());
    let quote = service
        .get_by_id(QuoteRequestId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("quote request {id}")))?;
    service.delete(&quote).await?;
    Ok(StatusCode::NO_CONTENT)
}
