//! Admin lead routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use dandeline_core::LeadId;

use crate::error::AppError;
use crate::models::{Lead, NewLead, UpdateLead};
use crate::services::{EntityService, LeadService};
use crate::state::AppState;

/// GET /admin/leads
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Lead>>, AppError> {
    let service = LeadService::new(state.pool(), state.dispatcher());
    Ok(Json(service.get_all().await?))
}

/// POST /admin/leads
#[instrument(skip(state, input))]
pub async fn store(
    State(state): State<AppState>,
    Json(input): Json<NewLead>,
) -> Result<(StatusCode, Json<Lead>), AppError> {
    let service = LeadService::new(state.pool(), state.dispatcher());
    let lead = service.store(input, None).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

/// GET /admin/leads/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Lead>, AppError> {
    let service = LeadService::new(state.pool(), state.dispatcher());
    let lead = service
        .get_by_id(LeadId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("lead {id}")))?;
    Ok(Json(lead))
}

/// PATCH /admin/leads/{id}
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateLead>,
) -> Result<Json<Lead>, AppError> {
    let service = LeadService::new(state.pool(), state.dispatcher());
    let lead = service
        .get_by_id(LeadId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("lead {id}")))?;
    let updated = service.update(input, &lead, None).await?;
    Ok(Json(updated))
}

/// DELETE /admin/leads/{id}
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let service = LeadService::new(state.pool(), state.dispatcher());
    let lead = service
        .get_by_id(LeadId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("lead {id}")))?;
    service.delete(&lead).await?;
    Ok(StatusCode::NO_CONTENT)
}
