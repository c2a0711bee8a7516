//! Product resource.

use std::sync::Arc;

use workshop_core::{CategoryId, ProductId};

use crate::db::ShopRepository;
use crate::error::{AppError, Result};
use crate::models::Product;

/// Read access to the product catalog.
#[derive(Clone)]
pub struct ProductResource {
    repository: Arc<dyn ShopRepository>,
}

impl ProductResource {
    #[must_use]
    pub fn new(repository: Arc<dyn ShopRepository>) -> Self {
        Self { repository }
    }

    /// All products, or only those in `category` when given.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the repository fails.
    pub async fn list(&self, category: Option<CategoryId>) -> Result<Vec<Product>> {
        Ok(self.repository.list_products(category).await?)
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no product has this ID.
    pub async fn get(&self, id: ProductId) -> Result<Product> {
        self.repository
            .get_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))
    }
}
