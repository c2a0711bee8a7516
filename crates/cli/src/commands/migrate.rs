//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! workshop migrate
//! ```
//!
//! # Environment Variables
//!
//! Reads the same `DB_*` variables as the API server.
//!
//! # Migration Files
//!
//! Migrations live in `crates/api/migrations/` and are embedded into the
//! binary at compile time.

use tracing::info;

use workshop_api::config::DatabaseConfig;
use workshop_api::db::{MIGRATOR, create_pool};

use super::CommandError;

/// Run all pending migrations against the shop database.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is unreachable,
/// or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let config = DatabaseConfig::from_env()?;

    info!(host = %config.host, database = %config.name, "Connecting to database...");
    let pool = create_pool(&config).await?;

    info!("Running migrations...");
    MIGRATOR.run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
