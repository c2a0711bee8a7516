//! `PostgreSQL` implementation of [`ShopRepository`].

use async_trait::async_trait;
use sqlx::PgPool;

use workshop_core::{CartId, CategoryId, ProductId};

use super::{
    CartRepository, CategoryRepository, ProductRepository, RepositoryError, ShopRepository,
};
use crate::models::{Cart, CartContents, Category, NewProduct, Product};

/// Repository backed by a `PostgreSQL` connection pool.
///
/// Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShopRepository for PgRepository {
    async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        CategoryRepository::new(&self.pool).list().await
    }

    async fn create_category(&self, name: &str) -> Result<Category, RepositoryError> {
        CategoryRepository::new(&self.pool).create(name).await
    }

    async fn list_products(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).list(category).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).get_by_id(id).await
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        ProductRepository::new(&self.pool).create(product).await
    }

    async fn list_carts(&self) -> Result<Vec<Cart>, RepositoryError> {
        CartRepository::new(&self.pool).list().await
    }

    async fn get_cart(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        CartRepository::new(&self.pool).get_by_id(id).await
    }

    async fn create_cart(&self, contents: &CartContents) -> Result<CartId, RepositoryError> {
        CartRepository::new(&self.pool).create(contents).await
    }

    async fn update_cart(
        &self,
        id: CartId,
        contents: &CartContents,
    ) -> Result<(), RepositoryError> {
        CartRepository::new(&self.pool)
            .replace_items(id, contents)
            .await
    }
}
