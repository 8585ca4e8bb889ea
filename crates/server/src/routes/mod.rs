//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (verifies database)
//!
//! # Storefront actions
//! GET  /store                   - Active products with prices
//! GET  /store/{slug}            - One active product
//! GET  /blog                    - Published blog posts
//! GET  /blog/{slug}             - One published post
//! POST /contact                 - Submit a contact message
//! POST /quote                   - Submit a quote request
//! POST /newsletter              - Subscribe to the newsletter
//! POST /checkout                - Create a checkout session from a cart
//! GET  /checkout/success        - Return from Stripe; materialize the order
//! GET  /orders/{id}/tracking    - USPS tracking for a shipped order
//!
//! # Admin (JSON resource routes)
//! GET  /admin                   - Dashboard counts
//! .../admin/messages            - Contact messages (list/update/delete)
//! .../admin/blog                - Blog posts (full CRUD)
//! .../admin/quotes              - Quote requests (list/update/delete)
//! .../admin/testimonials        - Testimonials (list/create/update/delete)
//! .../admin/leads               - Leads (full CRUD)
//! .../admin/categories          - Categories (list/create/update/delete)
//! .../admin/products            - Products (list/show/update/delete)
//! POST /admin/products/import-stripe              - Catalog import
//! POST /admin/products/{id}/prices/{pid}/current  - Set current price
//! .../admin/orders              - Orders (list/show/update)
//! .../admin/notifications       - Notifications (unread/read/read-all/delete)
//! .../admin/newsletter/subscribers - Subscribers (CRUD)
//! .../admin/newsletter/templates   - Templates (CRUD)
//! ```

pub mod admin;
pub mod blog;
pub mod checkout;
pub mod contact;
pub mod newsletter;
pub mod quote;
pub mod store;
pub mod tracking;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the public storefront routes router.
pub fn storefront_routes() -> Router<AppState> {
    Router::new()
        .route("/store", get(store::index))
        .route("/store/{slug}", get(store::show))
        .route("/blog", get(blog::index))
        .route("/blog/{slug}", get(blog::show))
        .route("/contact", post(contact::store))
        .route("/quote", post(quote::store))
        .route("/newsletter", post(newsletter::store))
        .route("/checkout", post(checkout::create))
        .route("/checkout/success", get(checkout::success))
        .route("/orders/{id}/tracking", get(tracking::show))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(storefront_routes())
        .nest("/admin", admin::routes())
}
