//! Seed the shop database with catalog entries from a YAML file.
//!
//! The file is parsed and validated before connecting to the database.

use std::path::Path;

use tracing::info;

use workshop_api::config::DatabaseConfig;
use workshop_api::db::{PgRepository, create_pool};
use workshop_api::seed::{Catalog, seed_catalog};

use super::CommandError;

/// Seed categories and products from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid, configuration
/// is missing, or database operations fail.
pub async fn catalog(path: &Path) -> Result<(), CommandError> {
    info!(path = %path.display(), "Loading catalog from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let catalog = Catalog::from_yaml(&content)?;

    info!(categories = catalog.categories.len(), "Catalog validated");

    let config = DatabaseConfig::from_env()?;
    let pool = create_pool(&config).await?;
    info!("Connected to database");

    let repository = PgRepository::new(pool);
    let summary = seed_catalog(&repository, &catalog).await?;

    info!("Seeding complete!");
    info!(
        "  Categories inserted: {} (skipped {})",
        summary.categories_inserted, summary.categories_skipped
    );
    info!(
        "  Products inserted: {} (skipped {})",
        summary.products_inserted, summary.products_skipped
    );

    Ok(())
}
