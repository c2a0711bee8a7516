//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DB_USR` - Database user
//! - `DB_PASS` - Database password
//! - `DB_HOST` - Database host
//! - `DB_NAME` - Database name
//!
//! ## Optional
//! - `DB_PORT` - Database port (default: 5432)
//! - `DB_MAX_CONNECTIONS` - Connection pool size (default: 10)
//! - `API_HOST` - Bind address (default: 127.0.0.1)
//! - `API_PORT` - Listen port (default: 5000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_TRACES_SAMPLE_RATE` - Fraction of requests traced (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Sentry settings, present only when `SENTRY_DSN` is set
    pub sentry: Option<SentryConfig>,
}

/// `PostgreSQL` connection settings.
///
/// `Debug` output redacts the password.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

/// Sentry error tracking settings.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: String,
    pub environment: Option<String>,
    pub traces_sample_rate: f32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let database = DatabaseConfig::from_lookup(&lookup)?;
        let host = env.parsed_or("API_HOST", "127.0.0.1")?;
        let port = env.parsed_or("API_PORT", "5000")?;
        let sentry = match env.optional("SENTRY_DSN") {
            Some(dsn) => Some(SentryConfig {
                dsn,
                environment: env.optional("SENTRY_ENVIRONMENT"),
                traces_sample_rate: env.parsed_or("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
            }),
            None => None,
        };

        Ok(Self {
            database,
            host,
            port,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DatabaseConfig {
    /// Load only the database settings from environment variables.
    ///
    /// Used by tools that need the database but not the HTTP server.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);
        Ok(Self {
            user: env.required("DB_USR")?,
            password: SecretString::from(env.required("DB_PASS")?),
            host: env.required("DB_HOST")?,
            port: env.parsed_or("DB_PORT", "5432")?,
            name: env.required("DB_NAME")?,
            max_connections: env.parsed_or("DB_MAX_CONNECTIONS", "10")?,
        })
    }

    /// Connection options for `sqlx`.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose_secret())
            .database(&self.name)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with typed accessors.
struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get a required variable. Empty values count as missing.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.is_empty())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key)
            .as_deref()
            .unwrap_or(default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const DB_VARS: &[(&str, &str)] = &[
        ("DB_USR", "shop"),
        ("DB_PASS", "hunter2-but-longer"),
        ("DB_HOST", "db.internal"),
        ("DB_NAME", "workshop"),
    ];

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup(DB_VARS)).unwrap();

        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5000");
        assert!(config.sentry.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut vars = DB_VARS.to_vec();
        vars.extend([
            ("DB_PORT", "6543"),
            ("API_HOST", "0.0.0.0"),
            ("API_PORT", "8080"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ]);

        let config = ApiConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.database.port, 6543);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        let sentry = config.sentry.unwrap();
        assert!((sentry.traces_sample_rate - 0.25).abs() < f32::EPSILON);
        assert!(sentry.environment.is_none());
    }

    #[test]
    fn test_missing_required() {
        let vars: Vec<_> = DB_VARS
            .iter()
            .copied()
            .filter(|(k, _)| *k != "DB_HOST")
            .collect();

        let err = ApiConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "DB_HOST"));
    }

    #[test]
    fn test_empty_required_counts_as_missing() {
        // Later pairs win when collected into the lookup map
        let mut vars = DB_VARS.to_vec();
        vars.push(("DB_USR", ""));

        let err = ApiConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "DB_USR"));
    }

    #[test]
    fn test_invalid_port() {
        let mut vars = DB_VARS.to_vec();
        vars.push(("DB_PORT", "not-a-port"));

        let err = ApiConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "DB_PORT"));
    }

    #[test]
    fn test_database_config_alone() {
        let mut vars = DB_VARS.to_vec();
        vars.extend([("DB_MAX_CONNECTIONS", "4"), ("API_PORT", "not-read-here")]);

        let config = DatabaseConfig::from_lookup(&lookup(&vars)).unwrap();

        assert_eq!(config.user, "shop");
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 5432);
        assert_eq!(config.name, "workshop");
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.password.expose_secret(), "hunter2-but-longer");
    }

    #[test]
    fn test_database_config_missing_password() {
        let vars: Vec<_> = DB_VARS
            .iter()
            .copied()
            .filter(|(k, _)| *k != "DB_PASS")
            .collect();

        let err = DatabaseConfig::from_lookup(&lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "DB_PASS"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ApiConfig::from_lookup(lookup(DB_VARS)).unwrap();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("db.internal"));
        assert!(!debug_output.contains("hunter2-but-longer"));
    }
}
