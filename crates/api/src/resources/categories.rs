//! Category resource.

use std::sync::Arc;

use crate::db::ShopRepository;
use crate::error::Result;
use crate::models::Category;

/// Read access to product categories.
#[derive(Clone)]
pub struct CategoryResource {
    repository: Arc<dyn ShopRepository>,
}

impl CategoryResource {
    #[must_use]
    pub fn new(repository: Arc<dyn ShopRepository>) -> Self {
        Self { repository }
    }

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the repository fails.
    pub async fn list(&self) -> Result<Vec<Category>> {
        Ok(self.repository.list_categories().await?)
    }
}
