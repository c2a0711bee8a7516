//! Cart resource.

use std::sync::Arc;

use tracing::info;

use workshop_core::CartId;

use super::payload::CartPayload;
use crate::db::ShopRepository;
use crate::error::{AppError, Result};
use crate::models::Cart;

/// Read and write access to shopping carts.
#[derive(Clone)]
pub struct CartResource {
    repository: Arc<dyn ShopRepository>,
}

impl CartResource {
    #[must_use]
    pub fn new(repository: Arc<dyn ShopRepository>) -> Self {
        Self { repository }
    }

    /// All carts with their priced items.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the repository fails.
    pub async fn list(&self) -> Result<Vec<Cart>> {
        Ok(self.repository.list_carts().await?)
    }

    /// A single cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no cart has this ID.
    pub async fn get(&self, id: CartId) -> Result<Cart> {
        self.repository
            .get_cart(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("cart {id}")))
    }

    /// Create a cart from a request payload and return its ID.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Integrity` if a line references an unknown product.
    pub async fn create(&self, payload: CartPayload) -> Result<CartId> {
        let contents = payload.into_contents()?;
        info!(lines = contents.lines().len(), "Creating cart");

        let id = self.repository.create_cart(&contents).await?;
        info!(cart_id = %id, "Cart created");
        Ok(id)
    }

    /// Replace the contents of an existing cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no cart has this ID.
    /// Returns `AppError::Integrity` if a line references an unknown product.
    pub async fn update(&self, id: CartId, payload: CartPayload) -> Result<()> {
        let contents = payload.into_contents()?;
        info!(cart_id = %id, lines = contents.lines().len(), "Updating cart");

        self.repository
            .update_cart(id, &contents)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::NotFound(_) => AppError::NotFound(format!("cart {id}")),
                other => other,
            })
    }
}
