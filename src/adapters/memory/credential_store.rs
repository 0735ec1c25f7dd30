//! In-Memory Credential Store

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::payment::{CachedToken, PaymobCredentials, PaymobSettings};
use crate::ports::CredentialStore;

#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    settings: Arc<RwLock<Option<PaymobSettings>>>,
}

impl InMemoryCredentialStore {
    /// Store with no credentials configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with credentials and an empty token cache.
    pub fn with_credentials(credentials: PaymobCredentials) -> Self {
        Self {
            settings: Arc::new(RwLock::new(Some(PaymobSettings::new(credentials)))),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> Result<Option<PaymobSettings>, DomainError> {
        Ok(self.settings.read().await.clone())
    }

    async fn save(&self, settings: &PaymobSettings) -> Result<(), DomainError> {
        *self.settings.write().await = Some(settings.clone());
        Ok(())
    }

    async fn save_token(&self, token: &CachedToken) -> Result<(), DomainError> {
        let mut settings = self.settings.write().await;
        match settings.as_mut() {
            Some(settings) => {
                settings.token = Some(token.clone());
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::CredentialsNotConfigured,
                "Cannot store a token before credentials are configured",
            )),
        }
    }
}
