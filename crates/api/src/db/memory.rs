//! In-memory implementation of [`ShopRepository`].
//!
//! Stores every table in ordered maps behind one lock and enforces the same
//! constraints as the `PostgreSQL` schema (unique category names, foreign
//! keys from products and cart lines). Used by tests and for running the API
//! without a database.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use workshop_core::{CartId, CategoryId, ProductId};

use super::{RepositoryError, ShopRepository};
use crate::models::{Cart, CartContents, CartItem, CartLine, Category, NewProduct, Product};

/// In-memory repository.
///
/// Clones share the same tables.
///
/// # Example
/// ```
/// use workshop_api::db::{MemoryRepository, ShopRepository};
///
/// # #[tokio::main]
/// # async fn main() {
/// let repo = MemoryRepository::new();
/// let coffee = repo.create_category("Coffee").await.unwrap();
/// assert_eq!(repo.list_categories().await.unwrap(), vec![coffee]);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    data: Arc<RwLock<MemoryData>>,
}

#[derive(Debug, Default)]
struct MemoryData {
    categories: BTreeMap<CategoryId, Category>,
    products: BTreeMap<ProductId, Product>,
    carts: BTreeMap<CartId, StoredCart>,
    last_category_id: i32,
    last_product_id: i32,
    last_cart_id: i32,
}

#[derive(Debug, Clone)]
struct StoredCart {
    lines: Vec<CartLine>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MemoryData {
    /// Reject lines that reference products which do not exist.
    fn check_lines(&self, contents: &CartContents) -> Result<(), RepositoryError> {
        match contents
            .lines()
            .iter()
            .find(|line| !self.products.contains_key(&line.product_id))
        {
            Some(line) => Err(RepositoryError::Integrity(format!(
                "cart line references unknown product {}",
                line.product_id
            ))),
            None => Ok(()),
        }
    }

    /// Price a stored cart against the current catalog.
    fn price_cart(&self, id: CartId, stored: &StoredCart) -> Result<Cart, RepositoryError> {
        let items = stored
            .lines
            .iter()
            .map(|line| {
                let product = self.products.get(&line.product_id).ok_or_else(|| {
                    RepositoryError::DataCorruption(format!(
                        "cart {id} references missing product {}",
                        line.product_id
                    ))
                })?;
                CartItem::new(line.product_id, line.quantity, product.price)
                    .map_err(|e| RepositoryError::DataCorruption(format!("cart {id}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Cart::new(id, items, stored.created_at, stored.updated_at)
            .map_err(|e| RepositoryError::DataCorruption(format!("cart {id}: {e}")))
    }
}

impl MemoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of carts stored.
    pub async fn cart_count(&self) -> usize {
        self.data.read().await.carts.len()
    }
}

#[async_trait]
impl ShopRepository for MemoryRepository {
    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self.data.read().await.categories.values().cloned().collect())
    }

    async fn create_category(&self, name: &str) -> Result<Category, RepositoryError> {
        if name.trim().is_empty() {
            return Err(RepositoryError::Integrity(
                "category name cannot be blank".to_owned(),
            ));
        }

        let mut data = self.data.write().await;
        if data.categories.values().any(|c| c.name == name) {
            return Err(RepositoryError::Integrity(format!(
                "category {name:?} already exists"
            )));
        }

        data.last_category_id += 1;
        let category = Category {
            id: CategoryId::new(data.last_category_id),
            name: name.to_owned(),
        };
        data.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn list_products(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .data
            .read()
            .await
            .products
            .values()
            .filter(|p| category.is_none_or(|id| p.category_id == id))
            .cloned()
            .collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.data.read().await.products.get(&id).cloned())
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        product
            .price
            .check_catalog()
            .map_err(|e| RepositoryError::Integrity(e.to_string()))?;

        let mut data = self.data.write().await;
        if !data.categories.contains_key(&product.category_id) {
            return Err(RepositoryError::Integrity(format!(
                "product references unknown category {}",
                product.category_id
            )));
        }

        data.last_product_id += 1;
        let stored = Product {
            id: ProductId::new(data.last_product_id),
            category_id: product.category_id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
        };
        data.products.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_carts(&self) -> Result<Vec<Cart>, RepositoryError> {
        let data = self.data.read().await;
        data.carts
            .iter()
            .map(|(id, stored)| data.price_cart(*id, stored))
            .collect()
    }

    async fn get_cart(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let data = self.data.read().await;
        data.carts
            .get(&id)
            .map(|stored| data.price_cart(id, stored))
            .transpose()
    }

    async fn create_cart(&self, contents: &CartContents) -> Result<CartId, RepositoryError> {
        let mut data = self.data.write().await;
        data.check_lines(contents)?;

        data.last_cart_id += 1;
        let id = CartId::new(data.last_cart_id);
        let now = Utc::now();
        data.carts.insert(
            id,
            StoredCart {
                lines: contents.lines().to_vec(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn update_cart(
        &self,
        id: CartId,
        contents: &CartContents,
    ) -> Result<(), RepositoryError> {
        let mut data = self.data.write().await;
        if !data.carts.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        data.check_lines(contents)?;

        let stored = data.carts.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        stored.lines = contents.lines().to_vec();
        stored.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use workshop_core::{Price, Quantity};

    use super::*;

    async fn seeded() -> (MemoryRepository, Product, Product) {
        let repo = MemoryRepository::new();
        let coffee = repo.create_category("Coffee").await.unwrap();
        let tea = repo.create_category("Tea").await.unwrap();
        let espresso = repo
            .create_product(&NewProduct {
                category_id: coffee.id,
                name: "Espresso".to_owned(),
                description: None,
                price: Price::new(Decimal::new(250, 2)).unwrap(),
                image_url: None,
            })
            .await
            .unwrap();
        let sencha = repo
            .create_product(&NewProduct {
                category_id: tea.id,
                name: "Sencha".to_owned(),
                description: Some("Green tea".to_owned()),
                price: Price::new(Decimal::new(400, 2)).unwrap(),
                image_url: None,
            })
            .await
            .unwrap();
        (repo, espresso, sencha)
    }

    fn contents(lines: &[(ProductId, i64)]) -> CartContents {
        CartContents::from_lines(lines.iter().map(|(product_id, quantity)| CartLine {
            product_id: *product_id,
            quantity: Quantity::new(*quantity).unwrap(),
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_category_is_integrity_error() {
        let repo = MemoryRepository::new();
        repo.create_category("Coffee").await.unwrap();

        let result = repo.create_category("Coffee").await;
        assert!(matches!(result, Err(RepositoryError::Integrity(_))));
    }

    #[tokio::test]
    async fn test_product_requires_existing_category() {
        let repo = MemoryRepository::new();
        let result = repo
            .create_product(&NewProduct {
                category_id: CategoryId::new(99),
                name: "Orphan".to_owned(),
                description: None,
                price: Price::ZERO,
                image_url: None,
            })
            .await;
        assert!(matches!(result, Err(RepositoryError::Integrity(_))));
    }

    #[tokio::test]
    async fn test_product_price_must_fit_catalog() {
        let repo = MemoryRepository::new();
        let coffee = repo.create_category("Coffee").await.unwrap();

        let result = repo
            .create_product(&NewProduct {
                category_id: coffee.id,
                name: "Gold Beans".to_owned(),
                description: None,
                price: Price::new(Decimal::new(100_000_000, 0)).unwrap(),
                image_url: None,
            })
            .await;

        assert!(matches!(result, Err(RepositoryError::Integrity(_))));
        assert!(repo.list_products(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_products_by_category() {
        let (repo, espresso, sencha) = seeded().await;

        let all = repo.list_products(None).await.unwrap();
        assert_eq!(all, vec![espresso.clone(), sencha]);

        let coffee_only = repo.list_products(Some(espresso.category_id)).await.unwrap();
        assert_eq!(coffee_only, vec![espresso]);
    }

    #[tokio::test]
    async fn test_create_and_get_cart() {
        let (repo, espresso, sencha) = seeded().await;

        let id = repo
            .create_cart(&contents(&[(sencha.id, 1), (espresso.id, 2)]))
            .await
            .unwrap();
        let cart = repo.get_cart(id).await.unwrap().unwrap();

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].product_id, espresso.id);
        assert_eq!(cart.total.to_string(), "9.00");
    }

    #[tokio::test]
    async fn test_create_cart_with_unknown_product_stores_nothing() {
        let (repo, espresso, _) = seeded().await;

        let result = repo
            .create_cart(&contents(&[(espresso.id, 1), (ProductId::new(404), 1)]))
            .await;

        assert!(matches!(result, Err(RepositoryError::Integrity(_))));
        assert_eq!(repo.cart_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_cart_replaces_lines() {
        let (repo, espresso, sencha) = seeded().await;
        let id = repo
            .create_cart(&contents(&[(espresso.id, 1)]))
            .await
            .unwrap();

        repo.update_cart(id, &contents(&[(sencha.id, 3)]))
            .await
            .unwrap();

        let cart = repo.get_cart(id).await.unwrap().unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].product_id, sencha.id);
        assert_eq!(cart.items[0].quantity.get(), 3);
        assert!(cart.updated_at >= cart.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_cart() {
        let (repo, espresso, _) = seeded().await;

        let result = repo
            .update_cart(CartId::new(1), &contents(&[(espresso.id, 1)]))
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_previous_lines() {
        let (repo, espresso, _) = seeded().await;
        let id = repo
            .create_cart(&contents(&[(espresso.id, 2)]))
            .await
            .unwrap();
        let before = repo.get_cart(id).await.unwrap().unwrap();

        let result = repo
            .update_cart(id, &contents(&[(ProductId::new(404), 1)]))
            .await;

        assert!(matches!(result, Err(RepositoryError::Integrity(_))));
        assert_eq!(repo.get_cart(id).await.unwrap().unwrap(), before);
    }
}
