//! Category route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::models::Category;
use crate::state::AppState;

/// `GET /api/category/list`
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.categories().list().await?))
}
