//! Public blog route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::db::BlogPostRepository;
use crate::error::AppError;
use crate::models::BlogPost;
use crate::state::AppState;

/// List published posts.
///
/// GET /blog
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, AppError> {
    let posts = BlogPostRepository::new(state.pool()).list_published().await?;
    Ok(Json(posts))
}

/// Show one published post by slug.
///
/// GET /blog/{slug}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    let post = BlogPostRepository::new(state.pool())
        .find_by_slug(&slug)
        .await?
        .filter(|post| post.is_published)
        .ok_or_else(|| AppError::NotFound(format!("blog post {slug}")))?;

    Ok(Json(post))
}
