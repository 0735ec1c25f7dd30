//! Credential store port.
//!
//! Holds the singleton Paymob settings record: merchant credentials and the
//! cached bearer token.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::payment::{CachedToken, PaymobSettings};

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the settings record.
    ///
    /// Returns `None` until credentials have been configured.
    async fn load(&self) -> Result<Option<PaymobSettings>, DomainError>;

    /// Replace the settings record, including the token cache.
    async fn save(&self, settings: &PaymobSettings) -> Result<(), DomainError>;

    /// Persist a freshly obtained token without touching the credentials.
    ///
    /// # Errors
    ///
    /// - `CredentialsNotConfigured` if no settings record exists
    async fn save_token(&self, token: &CachedToken) -> Result<(), DomainError>;
}
