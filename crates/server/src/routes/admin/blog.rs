//! Admin blog post routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use dandeline_core::BlogPostId;

use crate::error::AppError;
use crate::models::{BlogPost, NewBlogPost, UpdateBlogPost};
use crate::services::{BlogPostService, EntityService};
use crate::state::AppState;

/// GET /admin/blog
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, AppError> {
    let service = BlogPostService::new(state.pool());
    Ok(Json(service.get_all().await?))
}

/// POST /admin/blog
#[instrument(skip(state, input))]
pub async fn store(
    State(state): State<AppState>,
    Json(input): Json<NewBlogPost>,
) -> Result<(StatusCode, Json<BlogPost>), AppError> {
    let service = BlogPostService::new(state.pool());
    let post = service.store(input, None).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /admin/blog/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BlogPost>, AppError> {
    let service = BlogPostService::new(state.pool());
    let post = service
        .get_by_id(BlogPostId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("blog post {id}")))?;
    Ok(Json(post))
}

/// PATCH /admin/blog/{id}
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateBlogPost>,
) -> Result<Json<BlogPost>, AppError> {
    let service = BlogPostService::new(state.pool());
    let post = service
        .get_by_id(BlogPostId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("blog post {id}")))?;
    let updated = service.update(input, &post, None).await?;
    Ok(Json(updated))
}

/// DELETE /admin/blog/{id}
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let service = BlogPostService::new(state.pool());
    let post = service
        .get_by_id(BlogPostId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("blog post {id}")))?;
    service.delete(&post).await?;
    Ok(StatusCode::NO_CONTENT)
}
