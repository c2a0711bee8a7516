//! Integration tests for the workshop shop API.
//!
//! Tests drive the full router (middleware included) in-process with
//! `tower::ServiceExt::oneshot`, backed by a `MemoryRepository`. No database
//! or running server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p workshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - Category and product listings
//! - `carts` - Cart reads and writes
//! - `cors` - CORS headers and preflight handling
//! - `health` - Liveness and readiness

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use workshop_api::db::MemoryRepository;
use workshop_api::routes;
use workshop_api::seed::{Catalog, seed_catalog};
use workshop_api::state::AppState;

/// Catalog loaded by [`TestApp::seeded`].
///
/// IDs are assigned in file order: categories Coffee = 1, Tea = 2; products
/// Espresso = 1, Cold Brew = 2, Sencha = 3.
pub const TEST_CATALOG: &str = r#"
categories:
  - name: Coffee
    products:
      - name: Espresso
        price: "2.50"
      - name: Cold Brew
        price: "4.00"
        description: Steeped for 18 hours
  - name: Tea
    products:
      - name: Sencha
        price: "3.75"
"#;

/// The API router wired to an in-memory repository.
pub struct TestApp {
    pub repository: MemoryRepository,
    router: Router,
}

/// A fully buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    /// The `error` field of a JSON error body.
    #[must_use]
    pub fn error_kind(&self) -> Option<String> {
        self.json()["error"].as_str().map(str::to_owned)
    }

    /// A header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    /// An app with no data.
    #[must_use]
    pub fn empty() -> Self {
        let repository = MemoryRepository::new();
        let state = AppState::new(Arc::new(repository.clone()));
        Self {
            repository,
            router: routes::app(state),
        }
    }

    /// An app loaded with [`TEST_CATALOG`].
    ///
    /// # Panics
    ///
    /// Panics if the catalog fails to load.
    pub async fn seeded() -> Self {
        let app = Self::empty();
        let catalog = Catalog::from_yaml(TEST_CATALOG).expect("test catalog parses");
        seed_catalog(&app.repository, &catalog)
            .await
            .expect("test catalog seeds");
        app
    }

    /// Send a request through the full middleware stack.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body cannot be read.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        send_to(&self.router, request).await
    }

    /// `GET uri`.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(request(Method::GET, uri, None, Body::empty()))
            .await
    }

    /// Send `body` as `application/json`.
    pub async fn send_json(&self, method: Method, uri: &str, body: &Value) -> TestResponse {
        self.send(request(
            method,
            uri,
            Some("application/json"),
            Body::from(body.to_string()),
        ))
        .await
    }

    /// Send a raw body with an optional content type.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: &'static str,
    ) -> TestResponse {
        self.send(request(method, uri, content_type, Body::from(body)))
            .await
    }
}

/// Build a request.
///
/// # Panics
///
/// Panics if `uri` is not a valid URI.
#[must_use]
pub fn request(method: Method, uri: &str, content_type: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(body).expect("valid request")
}

/// Send a request through any router and buffer the response.
///
/// # Panics
///
/// Panics if the router fails or the body cannot be read.
pub async fn send_to(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");

    let (parts, body) = response.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("response body readable");

    TestResponse {
        status: parts.status,
        headers: parts.headers,
        body,
    }
}

/// Assert the fixed CORS header set is present.
///
/// # Panics
///
/// Panics if any header is missing or has another value.
pub fn assert_cors(resp: &TestResponse) {
    assert_eq!(resp.header("access-control-allow-origin"), Some("*"));
    assert_eq!(
        resp.header("access-control-allow-methods"),
        Some("GET, POST, PUT, OPTIONS")
    );
    assert_eq!(
        resp.header("access-control-allow-headers"),
        Some("Content-Type")
    );
    assert_eq!(
        resp.header("access-control-expose-headers"),
        Some("Location")
    );
}
