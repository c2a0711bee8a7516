//! Liveness and readiness tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, StatusCode};

use workshop_api::db::{RepositoryError, ShopRepository};
use workshop_api::models::{Cart, CartContents, Category, NewProduct, Product};
use workshop_api::routes;
use workshop_api::state::AppState;
use workshop_core::{CartId, CategoryId, ProductId};
use workshop_integration_tests::{TestApp, assert_cors, request, send_to};

/// A repository whose database never answers.
struct UnreachableRepository;

fn unreachable() -> RepositoryError {
    RepositoryError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl ShopRepository for UnreachableRepository {
    async fn health_check(&self) -> Result<(), RepositoryError> {
        Err(unreachable())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        Err(unreachable())
    }

    async fn create_category(&self, _name: &str) -> Result<Category, RepositoryError> {
        Err(unreachable())
    }

    async fn list_products(
        &self,
        _category: Option<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        Err(unreachable())
    }

    async fn get_product(&self, _id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Err(unreachable())
    }

    async fn create_product(&self, _product: &NewProduct) -> Result<Product, RepositoryError> {
        Err(unreachable())
    }

    async fn list_carts(&self) -> Result<Vec<Cart>, RepositoryError> {
        Err(unreachable())
    }

    async fn get_cart(&self, _id: CartId) -> Result<Option<Cart>, RepositoryError> {
        Err(unreachable())
    }

    async fn create_cart(&self, _contents: &CartContents) -> Result<CartId, RepositoryError> {
        Err(unreachable())
    }

    async fn update_cart(
        &self,
        _id: CartId,
        _contents: &CartContents,
    ) -> Result<(), RepositoryError> {
        Err(unreachable())
    }
}

fn unreachable_app() -> axum::Router {
    routes::app(AppState::new(Arc::new(UnreachableRepository)))
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::empty();

    let resp = app.get("/health").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body.as_ref(), b"ok");
}

#[tokio::test]
async fn test_readiness() {
    let app = TestApp::empty();

    let resp = app.get("/health/ready").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_cors(&resp);
}

#[tokio::test]
async fn test_readiness_when_repository_is_down() {
    let router = unreachable_app();

    let resp = send_to(
        &router,
        request(Method::GET, "/health/ready", None, Body::empty()),
    )
    .await;

    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_cors(&resp);
}

#[tokio::test]
async fn test_liveness_ignores_repository() {
    let router = unreachable_app();

    let resp = send_to(&router, request(Method::GET, "/health", None, Body::empty())).await;

    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_repository_failure_is_internal_error() {
    let router = unreachable_app();

    let resp = send_to(
        &router,
        request(Method::GET, "/api/category/list", None, Body::empty()),
    )
    .await;

    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.error_kind().as_deref(), Some("internal"));
    assert_cors(&resp);
}
