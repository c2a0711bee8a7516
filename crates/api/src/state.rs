//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::ShopRepository;
use crate::resources::{CartResource, CategoryResource, ProductResource};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and is built once at startup
/// from an explicitly constructed repository; handlers never reach for
/// process-wide globals.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    repository: Arc<dyn ShopRepository>,
    categories: CategoryResource,
    products: ProductResource,
    carts: CartResource,
}

impl AppState {
    /// Create a new application state around a repository.
    #[must_use]
    pub fn new(repository: Arc<dyn ShopRepository>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                categories: CategoryResource::new(Arc::clone(&repository)),
                products: ProductResource::new(Arc::clone(&repository)),
                carts: CartResource::new(Arc::clone(&repository)),
                repository,
            }),
        }
    }

    /// Get a reference to the repository.
    #[must_use]
    pub fn repository(&self) -> &dyn ShopRepository {
        self.inner.repository.as_ref()
    }

    /// Get a reference to the category resource.
    #[must_use]
    pub fn categories(&self) -> &CategoryResource {
        &self.inner.categories
    }

    /// Get a reference to the product resource.
    #[must_use]
    pub fn products(&self) -> &ProductResource {
        &self.inner.products
    }

    /// Get a reference to the cart resource.
    #[must_use]
    pub fn carts(&self) -> &CartResource {
        &self.inner.carts
    }
}
