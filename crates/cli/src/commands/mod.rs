//! Subcommand implementations.

pub mod migrate;
pub mod seed;

use thiserror::Error;

use workshop_api::config::ConfigError;
use workshop_api::seed::SeedError;

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Seed(#[from] SeedError),
}
