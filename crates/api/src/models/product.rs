//! Product domain types.

use serde::Serialize;

use workshop_core::{CategoryId, Price, ProductId};

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Category this product is filed under.
    pub category_id: CategoryId,
    /// Display name.
    pub name: String,
    /// Optional long-form description.
    pub description: Option<String>,
    /// Unit price.
    pub price: Price,
    /// Optional image location.
    pub image_url: Option<String>,
}

/// Fields required to insert a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub image_url: Option<String>,
}
