//! Application configuration module
//!
//! Configuration is loaded from environment variables with the
//! `PAYMOB_GATEWAY` prefix; nested values use double underscores.
//!
//! # Example
//!
//! ```no_run
//! use paymob_gateway::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod admin;
mod database;
mod error;
mod paymob;
mod server;

pub use admin::AdminConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use paymob::PaymobConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Paymob gateway configuration
    #[serde(default)]
    pub paymob: PaymobConfig,

    /// Admin endpoint protection
    #[serde(default)]
    pub admin: AdminConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `PAYMOB_GATEWAY__*` variables:
    ///
    /// - `PAYMOB_GATEWAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PAYMOB_GATEWAY__DATABASE__URL=...` -> `database.url = ...`
    /// - `PAYMOB_GATEWAY__PAYMOB__HMAC_SECRET=...` -> `paymob.hmac_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PAYMOB_GATEWAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let production = self.is_production();
        self.server.validate()?;
        self.database.validate()?;
        self.paymob.validate(production)?;
        self.admin.validate(production)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
