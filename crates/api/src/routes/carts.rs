//! Cart route handlers.
//!
//! Write handlers take the raw body so that missing, malformed and falsy
//! JSON all surface as the same `empty_body` error.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State, rejection::PathRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use workshop_core::CartId;

use super::path_id;
use crate::error::Result;
use crate::models::Cart;
use crate::resources::payload::CartPayload;
use crate::state::AppState;

/// URL of a cart's detail endpoint.
#[must_use]
pub fn cart_location(id: CartId) -> String {
    format!("/api/cart/{id}")
}

fn decode_body(headers: &HeaderMap, body: &Bytes) -> Result<CartPayload> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    CartPayload::from_request(content_type, body)
}

/// `GET /api/cart/list`
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Cart>>> {
    Ok(Json(state.carts().list().await?))
}

/// `GET /api/cart/{id}`
#[instrument(skip(state, path))]
pub async fn show(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Cart>> {
    let id: CartId = path_id(path)?;
    Ok(Json(state.carts().get(id).await?))
}

/// `POST /api/cart`
///
/// Answers `201 Created` with a `Location` header pointing at the new cart.
#[instrument(skip(state, headers, body))]
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let payload = decode_body(&headers, &body)?;
    let id = state.carts().create(payload).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, cart_location(id))],
    )
        .into_response())
}

/// `PUT /api/cart/{id}`
///
/// Answers `204 No Content` once the cart's lines have been replaced.
#[instrument(skip(state, path, headers, body))]
pub async fn update(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    let id: CartId = path_id(path)?;
    let payload = decode_body(&headers, &body)?;
    state.carts().update(id, payload).await?;

    Ok(StatusCode::NO_CONTENT)
}
