//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Paymob API base URL must be an absolute http(s) URL")]
    InvalidGatewayUrl,

    #[error("Paymob API base URL must use HTTPS in production")]
    GatewayUrlMustBeHttps,

    #[error("Token refresh buffer must be shorter than the token lifetime")]
    InvalidTokenPolicy,

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Payment key expiration must be positive")]
    InvalidKeyExpiration,

    #[error("Admin API key is required in production")]
    AdminKeyRequired,
}
