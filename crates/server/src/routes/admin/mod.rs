//! Admin JSON resource routes.
//!
//! Consumed by the admin dashboard UI; every handler speaks JSON and maps
//! failures through [`crate::error::AppError`].

pub mod blog;
pub mod categories;
pub mod dashboard;
pub mod leads;
pub mod messages;
pub mod newsletter;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod quotes;
pub mod testimonials;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

/// Create the contact message routes router.
pub fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(messages::index))
        .route("/{id}", patch(messages::update).delete(messages::destroy))
}

/// Create the blog post routes router.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::index).post(blog::store))
        .route(
            "/{id}",
            get(blog::show).patch(blog::update).delete(blog::destroy),
        )
}

/// Create the quote request routes router.
pub fn quote_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(quotes::index))
        .route("/{id}", patch(quotes::update).delete(quotes::destroy))
}

/// Create the testimonial routes router.
pub fn testimonial_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(testimonials::index).post(testimonials::store))
        .route(
            "/{id}",
            patch(testimonials::update).delete(testimonials::destroy),
        )
}

/// Create the lead routes router.
pub fn lead_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(leads::index).post(leads::store))
        .route(
            "/{id}",
            get(leads::show).patch(leads::update).delete(leads::destroy),
        )
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::store))
        .route(
            "/{id}",
            patch(categories::update).delete(categories::destroy),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/import-stripe", post(products::import_stripe))
        .route(
            "/{id}",
            get(products::show)
                .patch(products::update)
                .delete(products::destroy),
        )
        .route(
            "/{id}/prices/{price_id}/current",
            post(products::set_current_price),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show).patch(orders::update))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/unread", get(notifications::unread))
        .route("/{id}/read", patch(notifications::mark_read))
        .route("/read-all", patch(notifications::mark_all_read))
        .route("/{id}", delete(notifications::destroy))
}

/// Create the newsletter routes router (subscribers + templates).
pub fn newsletter_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/subscribers",
            get(newsletter::subscribers_index).post(newsletter::subscribers_store),
        )
        .route(
            "/subscribers/{id}",
            patch(newsletter::subscribers_update).delete(newsletter::subscribers_destroy),
        )
        .route(
            "/templates",
            get(newsletter::templates_index).post(newsletter::templates_store),
        )
        .route(
            "/templates/{id}",
            get(newsletter::templates_show)
                .patch(newsletter::templates_update)
                .delete(newsletter::templates_destroy),
        )
}

/// Create all admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .nest("/messages", message_routes())
        .nest("/blog", blog_routes())
        .nest("/quotes", quote_routes())
        .nest("/testimonials", testimonial_routes())
        .nest("/leads", lead_routes())
        .nest("/categories", category_routes())
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .nest("/notifications", notification_routes())
        .nest("/newsletter", newsletter_routes())
}
