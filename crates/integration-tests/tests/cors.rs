//! CORS header tests.

use axum::body::Body;
use axum::http::{Method, StatusCode};

use workshop_integration_tests::{TestApp, assert_cors, request};

#[tokio::test]
async fn test_success_has_cors_headers() {
    let app = TestApp::seeded().await;

    let resp = app.get("/api/category/list").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_cors(&resp);
}

#[tokio::test]
async fn test_errors_have_cors_headers() {
    let app = TestApp::seeded().await;

    let missing = app.get("/api/cart/404").await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_cors(&missing);

    let empty = app
        .send_raw(Method::POST, "/api/cart", None, "")
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_cors(&empty);

    let unrouted = app.get("/api/nothing-here").await;
    assert_eq!(unrouted.status, StatusCode::NOT_FOUND);
    assert_cors(&unrouted);
}

#[tokio::test]
async fn test_preflight() {
    let app = TestApp::seeded().await;

    for uri in ["/api/cart", "/api/cart/1", "/api/product/list"] {
        let resp = app
            .send(request(Method::OPTIONS, uri, None, Body::empty()))
            .await;

        assert_eq!(resp.status, StatusCode::NO_CONTENT, "{uri}");
        assert!(resp.body.is_empty());
        assert_cors(&resp);
    }
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::seeded().await;

    let mut req = request(Method::GET, "/api/category/list", None, Body::empty());
    req.headers_mut()
        .insert("x-request-id", "req-123".parse().expect("header value"));
    let resp = app.send(req).await;

    assert_eq!(resp.header("x-request-id"), Some("req-123"));
}
