//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (repository reachable)
//!
//! # Categories
//! GET  /api/category/list      - All categories
//!
//! # Products
//! GET  /api/product/list       - All products (optional ?category_id=)
//! GET  /api/product/{id}       - Product detail
//!
//! # Carts
//! GET  /api/cart/list          - All carts
//! POST /api/cart               - Create cart (201 + Location)
//! GET  /api/cart/{id}          - Cart detail
//! PUT  /api/cart/{id}          - Replace cart contents (204)
//! ```

pub mod carts;
pub mod categories;
pub mod health;
pub mod products;

use axum::{
    Router,
    extract::{Path, Request, rejection::PathRejection},
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::error::{AppError, Result};
use crate::middleware::{cors_middleware, request_id_middleware};
use crate::state::AppState;

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new().route("/list", get(categories::list))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(products::list))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(carts::create))
        .route("/list", get(carts::list))
        .route("/{id}", get(carts::show).put(carts::update))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/category", category_routes())
        .nest("/api/product", product_routes())
        .nest("/api/cart", cart_routes())
}

/// Build the complete application: routes, middleware and state.
pub fn app(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = tracing::field::Empty,
        )
    });

    routes()
        .layer(from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(from_fn(cors_middleware))
        .with_state(state)
}

/// Convert an extracted integer path segment into a typed ID.
///
/// # Errors
///
/// Returns `AppError::InvalidParameter` if the segment is not an integer.
pub fn path_id<T: From<i32>>(path: std::result::Result<Path<i32>, PathRejection>) -> Result<T> {
    path.map(|Path(id)| T::from(id))
        .map_err(|e| AppError::InvalidParameter(e.body_text()))
}
