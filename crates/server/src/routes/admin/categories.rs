//! Admin category routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use dandeline_core::CategoryId;

use crate::error::AppError;
use crate::models::{Category, NewCategory, UpdateCategory};
use crate::services::{CategoryService, EntityService};
use crate::state::AppState;

/// GET /admin/categories
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    let service = CategoryService::new(state.pool());
    Ok(Json(service.get_all().await?))
}

/// POST /admin/categories
#[instrument(skip(state, input))]
pub async fn store(
    State(state): State<AppState>,
    Json(input): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let service = CategoryService::new(state.pool());
    let category = service.store(input, Some(&[])).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PATCH /admin/categories/{id}
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateCategory>,
) -> Result<Json<Category>, AppError> {
    let service = CategoryService::new(state.pool());
    let category = service
        .get_by_id(CategoryId::new(id), Some(&[]))
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("category {id}")))?;
    let updated = service.update(input, &category, Some(&[])).await?;
    Ok(Json(updated))
}

/// DELETE /admin/categories/{id}
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let service = CategoryService::new(state.pool());
    let category = service
        .get_by_id(CategoryId::new(id), Some(&[]))
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("category {id}")))?;
    service.delete(&category).await?;
    Ok(StatusCode::NO_CONTENT)
}
