//! Product queries.

use rust_decimal::Decimal;
use sqlx::PgPool;

use workshop_core::{CategoryId, Price, ProductId};

use super::RepositoryError;
use crate::models::{NewProduct, Product};

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    category_id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
    image_url: Option<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            category_id: CategoryId::new(row.category_id),
            name: row.name,
            description: row.description,
            price,
            image_url: row.image_url,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products ordered by ID, optionally limited to one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is negative.
    pub async fn list(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, category_id, name, description, price, image_url
            FROM shop.product
            WHERE $1::INTEGER IS NULL OR category_id = $1
            ORDER BY id
            ",
        )
        .bind(category.map(|id| id.as_i32()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored price is negative.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, category_id, name, description, price, image_url
            FROM shop.product
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Integrity` if the category does not exist or
    /// the price does not fit the price column.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        product
            .price
            .check_catalog()
            .map_err(|e| RepositoryError::Integrity(e.to_string()))?;

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO shop.product (category_id, name, description, price, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, category_id, name, description, price, image_url
            ",
        )
        .bind(product.category_id.as_i32())
        .bind(&product.name)
        .bind(product.description.as_deref())
        .bind(product.price.amount())
        .bind(product.image_url.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        row.try_into()
    }
}
