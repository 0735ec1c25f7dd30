//! Database configuration
//!
//! Tracked requests and the Paymob settings row live in PostgreSQL.

use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use super::error::ValidationError;

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Apply `migrations/` before serving
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Pool options derived from this configuration.
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(self.min_connections)
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout())
    }

    /// Validate database configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE__URL"));
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > 100 {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            min_connections: default_min_connections(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            run_migrations: default_run_migrations(),
        }
    }
}

fn default_min_connections() -> u32 {
    1
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    10
}

fn default_run_migrations() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postgres(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_keep_a_small_pool_and_migrate() {
        let config = DatabaseConfig::default();
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout(), Duration::from_secs(10));
        assert!(config.run_migrations);
    }

    #[test]
    fn empty_url_is_missing() {
        assert!(matches!(
            DatabaseConfig::default().validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn non_postgres_url_is_rejected() {
        assert!(matches!(
            postgres("sqlite://payments.db").validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        ));
    }

    #[test]
    fn inverted_pool_bounds_are_rejected() {
        let config = DatabaseConfig {
            min_connections: 12,
            max_connections: 4,
            ..postgres("postgres://localhost/payments")
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPoolSize)
        ));
    }

    #[test]
    fn oversized_pool_is_rejected() {
        let config = DatabaseConfig {
            max_connections: 150,
            ..postgres("postgresql://localhost/payments")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn both_postgres_schemes_are_accepted() {
        assert!(postgres("postgres://u:p@localhost:5432/payments").validate().is_ok());
        assert!(postgres("postgresql://u:p@localhost:5432/payments").validate().is_ok());
    }
}
