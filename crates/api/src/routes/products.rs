//! Product route handlers.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use serde::Deserialize;
use tracing::instrument;

use workshop_core::{CategoryId, ProductId};

use super::path_id;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub category_id: Option<i32>,
}

/// `GET /api/product/list`
#[instrument(skip(state, query))]
pub async fn list(
    State(state): State<AppState>,
    query: std::result::Result<Query<ProductListQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>> {
    let Query(query) = query.map_err(|e| AppError::InvalidParameter(e.body_text()))?;
    let category = query.category_id.map(CategoryId::new);

    Ok(Json(state.products().list(category).await?))
}

/// `GET /api/product/{id}`
#[instrument(skip(state, path))]
pub async fn show(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Product>> {
    let id: ProductId = path_id(path)?;
    Ok(Json(state.products().get(id).await?))
}
