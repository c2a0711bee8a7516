//! Category and product listing tests.

use axum::http::StatusCode;
use serde_json::json;

use workshop_integration_tests::TestApp;

#[tokio::test]
async fn test_category_list() {
    let app = TestApp::seeded().await;

    let resp = app.get("/api/category/list").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.json(),
        json!([{"id": 1, "name": "Coffee"}, {"id": 2, "name": "Tea"}])
    );
}

#[tokio::test]
async fn test_empty_lists_are_arrays() {
    let app = TestApp::empty();

    for uri in ["/api/category/list", "/api/product/list", "/api/cart/list"] {
        let resp = app.get(uri).await;
        assert_eq!(resp.status, StatusCode::OK, "{uri}");
        assert_eq!(resp.json(), json!([]), "{uri}");
    }
}

#[tokio::test]
async fn test_product_list() {
    let app = TestApp::seeded().await;

    let resp = app.get("/api/product/list").await;

    assert_eq!(resp.status, StatusCode::OK);
    let products = resp.json();
    let names: Vec<&str> = products
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names, ["Espresso", "Cold Brew", "Sencha"]);
}

#[tokio::test]
async fn test_product_list_by_category() {
    let app = TestApp::seeded().await;

    let resp = app.get("/api/product/list?category_id=2").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.json(),
        json!([{
            "id": 3,
            "category_id": 2,
            "name": "Sencha",
            "description": null,
            "price": "3.75",
            "image_url": null
        }])
    );
}

#[tokio::test]
async fn test_product_list_unknown_category_is_empty() {
    let app = TestApp::seeded().await;

    let resp = app.get("/api/product/list?category_id=99").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json(), json!([]));
}

#[tokio::test]
async fn test_product_list_bad_category_param() {
    let app = TestApp::seeded().await;

    let resp = app.get("/api/product/list?category_id=coffee").await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_kind().as_deref(), Some("invalid_parameter"));
}

#[tokio::test]
async fn test_product_detail() {
    let app = TestApp::seeded().await;

    let resp = app.get("/api/product/2").await;

    assert_eq!(resp.status, StatusCode::OK);
    let product = resp.json();
    assert_eq!(product["name"], "Cold Brew");
    assert_eq!(product["category_id"], 1);
    assert_eq!(product["price"], "4.00");
    assert_eq!(product["description"], "Steeped for 18 hours");
}

#[tokio::test]
async fn test_missing_product_is_bad_request() {
    let app = TestApp::seeded().await;

    let resp = app.get("/api/product/404").await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_kind().as_deref(), Some("not_found"));
}

#[tokio::test]
async fn test_non_integer_product_id() {
    let app = TestApp::seeded().await;

    let resp = app.get("/api/product/espresso").await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_kind().as_deref(), Some("invalid_parameter"));
}
