//! Seed the catalog from YAML.
//!
//! Seeding is idempotent: categories are matched by name and products by
//! `(category, name)`, so running it twice inserts nothing the second time.
//!
//! ## YAML Format
//!
//! ```yaml
//! categories:
//!   - name: Coffee
//!     products:
//!       - name: Espresso
//!         price: "2.50"
//!       - name: Cold Brew
//!         price: "4.00"
//!         description: Steeped for 18 hours
//!         image_url: /img/cold-brew.jpg
//! ```

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use workshop_core::{CategoryId, Price};

use crate::db::{RepositoryError, ShopRepository};
use crate::models::NewProduct;

/// Errors raised while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Full catalog file structure.
#[derive(Debug, Deserialize)]
pub struct Catalog {
    pub categories: Vec<CategorySeed>,
}

/// A category and the products filed under it.
#[derive(Debug, Deserialize)]
pub struct CategorySeed {
    pub name: String,
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// A product to insert. `price` is a decimal string such as `"2.50"`.
#[derive(Debug, Deserialize)]
pub struct ProductSeed {
    pub name: String,
    pub price: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Result of a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories_inserted: usize,
    pub categories_skipped: usize,
    pub products_inserted: usize,
    pub products_skipped: usize,
}

impl Catalog {
    /// Parse and validate a YAML catalog.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Parse` if the YAML is malformed.
    /// Returns `SeedError::Invalid` if a name is blank or a price is unusable.
    pub fn from_yaml(content: &str) -> Result<Self, SeedError> {
        let catalog: Self = serde_yaml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check every name and price before anything is written.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Invalid` describing the first problem found.
    pub fn validate(&self) -> Result<(), SeedError> {
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(SeedError::Invalid("category with blank name".to_owned()));
            }
            for product in &category.products {
                if product.name.trim().is_empty() {
                    return Err(SeedError::Invalid(format!(
                        "product with blank name in {}",
                        category.name
                    )));
                }
                product.parsed_price()?;
            }
        }
        Ok(())
    }
}

impl ProductSeed {
    fn parsed_price(&self) -> Result<Price, SeedError> {
        let amount = Decimal::from_str(self.price.trim()).map_err(|e| {
            SeedError::Invalid(format!("price {:?} of {}: {e}", self.price, self.name))
        })?;
        Price::for_catalog(amount)
            .map_err(|e| SeedError::Invalid(format!("price of {}: {e}", self.name)))
    }
}

/// Insert every category and product of `catalog` that is not already stored.
///
/// # Errors
///
/// Returns `SeedError::Invalid` if the catalog fails validation.
/// Returns `SeedError::Repository` if a read or write fails.
#[instrument(skip_all, fields(categories = catalog.categories.len()))]
pub async fn seed_catalog(
    repository: &dyn ShopRepository,
    catalog: &Catalog,
) -> Result<SeedSummary, SeedError> {
    catalog.validate()?;

    let mut summary = SeedSummary::default();

    let mut category_ids: HashMap<String, CategoryId> = repository
        .list_categories()
        .await?
        .into_iter()
        .map(|c| (c.name, c.id))
        .collect();

    let mut existing_products: HashSet<(CategoryId, String)> = repository
        .list_products(None)
        .await?
        .into_iter()
        .map(|p| (p.category_id, p.name))
        .collect();

    for category in &catalog.categories {
        let category_id = if let Some(id) = category_ids.get(&category.name) {
            summary.categories_skipped += 1;
            debug!(category = %category.name, "Category already exists");
            *id
        } else {
            let created = repository.create_category(&category.name).await?;
            summary.categories_inserted += 1;
            category_ids.insert(created.name, created.id);
            created.id
        };

        for product in &category.products {
            if !existing_products.insert((category_id, product.name.clone())) {
                summary.products_skipped += 1;
                debug!(product = %product.name, "Product already exists");
                continue;
            }

            repository
                .create_product(&NewProduct {
                    category_id,
                    name: product.name.clone(),
                    description: product.description.clone(),
                    price: product.parsed_price()?,
                    image_url: product.image_url.clone(),
                })
                .await?;
            summary.products_inserted += 1;
        }
    }

    info!(
        categories_inserted = summary.categories_inserted,
        categories_skipped = summary.categories_skipped,
        products_inserted = summary.products_inserted,
        products_skipped = summary.products_skipped,
        "Seeding complete"
    );

    Ok(summary)
}
