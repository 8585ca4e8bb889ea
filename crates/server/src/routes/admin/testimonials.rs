//! Admin testimonial routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use dandeline_core::TestimonialId;

use crate::error::AppError;
use crate::models::{NewTestimonial, Testimonial, UpdateTestimonial};
use crate::services::{EntityService, TestimonialService};
use crate::state::AppState;

/// GET /admin/testimonials
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Testimonial>>, AppError> {
    let service = TestimonialService::new(state.pool());
    Ok(Json(service.get_all().await?))
}

/// POST /admin/testimonials
#[instrument(skip(state, input))]
pub async fn store(
    State(state): State<AppState>,
    Json(input): Json<NewTestimonial>,
) -> Result<(StatusCode, Json<Testimonial>), AppError> {
    let service = TestimonialService::new(state.pool());
    let testimonial = service.store(input, None).await?;
    Ok((StatusCode::CREATED, Json(testimonial)))
}

/// PATCH /admin/testimonials/{id}
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateTestimonial>,
) -> Result<Json<Testimonial>, AppError> {
    let service = TestimonialService::new(state.pool());
    let testimonial = service
        .get_by_id(TestimonialId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("testimonial {id}")))?;
    let updated = service.update(input, &testimonial, None).await?;
    Ok(Json(updated))
}

/// DELETE /admin/testimonials/{id}
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let service = TestimonialService::new(state.pool());
    let testimonial = service
        .get_by_id(TestimonialId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("testimonial {id}")))?;
    service.delete(&testimonial).await?;
    Ok(StatusCode::NO_CONTENT)
}
