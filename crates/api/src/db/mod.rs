//! Data access for the shop database.
//!
//! # Schema: `shop`
//!
//! ## Tables
//!
//! - `category` - Product categories (unique names)
//! - `product` - Catalog entries, each filed under one category
//! - `cart` - Shopping carts
//! - `cart_item` - One line per (cart, product) with a positive quantity
//!
//! # Implementations
//!
//! - [`PgRepository`] - `PostgreSQL` via a `sqlx` connection pool
//! - [`MemoryRepository`] - In-process tables for tests and local development
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p workshop-cli -- migrate
//! ```

pub mod carts;
pub mod categories;
pub mod memory;
pub mod postgres;
pub mod products;

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use workshop_core::{CartId, CategoryId, ProductId};

use crate::config::DatabaseConfig;
use crate::models::{Cart, CartContents, Category, NewProduct, Product};

pub use carts::CartRepository;
pub use categories::CategoryRepository;
pub use memory::MemoryRepository;
pub use postgres::PgRepository;
pub use products::ProductRepository;

/// Embedded schema migrations for the shop database.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Write rejected by a schema constraint (foreign key, unique, check).
    #[error("integrity violation: {0}")]
    Integrity(String),
}

impl RepositoryError {
    /// Classify an error raised by an INSERT or UPDATE.
    ///
    /// Constraint violations become `Integrity`; everything else stays `Database`.
    #[must_use]
    pub fn from_write(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && (db_err.is_foreign_key_violation()
                || db_err.is_unique_violation()
                || db_err.is_check_violation())
        {
            return Self::Integrity(db_err.message().to_owned());
        }
        Self::Database(e)
    }
}

/// Data access for categories, products and carts.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; one instance is shared by every
/// request handler.
#[async_trait]
pub trait ShopRepository: Send + Sync {
    /// Check that the backing store answers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store is unreachable.
    async fn health_check(&self) -> Result<(), RepositoryError>;

    /// All categories, ordered by ID.
    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError>;

    /// Insert a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Integrity` if the name is taken.
    async fn create_category(&self, name: &str) -> Result<Category, RepositoryError>;

    /// Products ordered by ID, optionally restricted to one category.
    async fn list_products(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError>;

    /// A single product, or `None` if it does not exist.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Integrity` if the category does not exist.
    async fn create_product(&self, product: &NewProduct) -> Result<Product, RepositoryError>;

    /// All carts with their items, ordered by ID.
    async fn list_carts(&self) -> Result<Vec<Cart>, RepositoryError>;

    /// A single cart with its items, or `None` if it does not exist.
    async fn get_cart(&self, id: CartId) -> Result<Option<Cart>, RepositoryError>;

    /// Create a cart holding `contents` and return its ID.
    ///
    /// Nothing is stored if any line is rejected.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Integrity` if a line references an unknown product.
    async fn create_cart(&self, contents: &CartContents) -> Result<CartId, RepositoryError>;

    /// Replace the lines of an existing cart with `contents`.
    ///
    /// The cart is left untouched if any line is rejected.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart does not exist.
    /// Returns `RepositoryError::Integrity` if a line references an unknown product.
    async fn update_cart(&self, id: CartId, contents: &CartContents)
    -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool from the database settings.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(config.connect_options())
        .await
}
