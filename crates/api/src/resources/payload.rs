//! Decoding of cart write requests.
//!
//! A body counts as empty when the request is not declared as JSON, when it
//! does not parse, or when it parses to a falsy value (`null`, `false`, `0`,
//! `""`, `[]`, `{}`). Empty bodies are rejected before any shape checks.

use serde::Deserialize;
use serde_json::Value;

use workshop_core::{ProductId, Quantity};

use crate::error::{AppError, Result};
use crate::models::{CartContents, CartLine};

/// Body of `POST /api/cart` and `PUT /api/cart/{id}`.
///
/// ```json
/// {"items": [{"product_id": 3, "quantity": 2}, {"product_id": 5}]}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CartPayload {
    pub items: Vec<CartLinePayload>,
}

/// One requested line. `quantity` defaults to 1.
#[derive(Debug, Clone, Deserialize)]
pub struct CartLinePayload {
    pub product_id: ProductId,
    #[serde(default)]
    pub quantity: Quantity,
}

impl CartPayload {
    /// Decode a raw request body.
    ///
    /// # Errors
    ///
    /// Returns `AppError::EmptyBody` if the body is missing, not JSON, or falsy.
    /// Returns `AppError::InvalidBody` if the JSON does not describe cart lines.
    pub fn from_request(content_type: Option<&str>, body: &[u8]) -> Result<Self> {
        if !content_type.is_some_and(is_json_content_type) {
            return Err(AppError::EmptyBody);
        }

        let value: Value = serde_json::from_slice(body).map_err(|_| AppError::EmptyBody)?;
        if is_falsy(&value) {
            return Err(AppError::EmptyBody);
        }

        serde_json::from_value(value).map_err(|e| AppError::InvalidBody(e.to_string()))
    }

    /// Merge the requested lines into storable cart contents.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidBody` if merged quantities overflow.
    pub fn into_contents(self) -> Result<CartContents> {
        CartContents::from_lines(self.items.into_iter().map(|line| CartLine {
            product_id: line.product_id,
            quantity: line.quantity,
        }))
        .map_err(|e| AppError::InvalidBody(e.to_string()))
    }
}

/// `application/json` or any `+json` media type, ignoring parameters.
fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

#[allow(clippy::float_cmp)] // exact zero is the only falsy number
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
