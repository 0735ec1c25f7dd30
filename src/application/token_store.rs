//! TokenStore - cached Paymob bearer token.
//!
//! Paymob tokens live for roughly an hour. The store treats them as valid
//! for `ttl_minutes` after issue and refreshes them once fewer than
//! `refresh_buffer_minutes` remain, so a token handed to a caller is always
//! good for at least the buffer.
//!
//! Refreshes are not serialized: two callers that both see a stale token
//! will both authenticate, and the last token written wins. Both tokens are
//! valid at the gateway, so this only costs an extra auth call.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{error, info};

use crate::domain::foundation::Timestamp;
use crate::domain::payment::{CachedToken, PaymentError, PaymobCredentials, PaymobSettings};
use crate::ports::{CredentialStore, GatewayClient};

/// Token lifetime rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    pub ttl_minutes: i64,
    pub refresh_buffer_minutes: i64,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            ttl_minutes: 50,
            refresh_buffer_minutes: 2,
        }
    }
}

pub struct TokenStore {
    credential_store: Arc<dyn CredentialStore>,
    gateway: Arc<dyn GatewayClient>,
    policy: TokenPolicy,
}

impl TokenStore {
    pub fn new(
        credential_store: Arc<dyn CredentialStore>,
        gateway: Arc<dyn GatewayClient>,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            credential_store,
            gateway,
            policy,
        }
    }

    /// Returns a token with at least the refresh buffer of validity left.
    pub async fn get_valid_token(&self) -> Result<SecretString, PaymentError> {
        self.get_valid_token_at(Timestamp::now()).await
    }

    /// Same as [`get_valid_token`](Self::get_valid_token) with an explicit clock.
    pub async fn get_valid_token_at(&self, now: Timestamp) -> Result<SecretString, PaymentError> {
        let settings = self.settings().await?;

        if let Some(cached) = &settings.token {
            if cached.is_usable_at(now, self.policy.refresh_buffer_minutes) {
                return Ok(cached.token.clone());
            }
        }

        let token = self.refresh_with(&settings.credentials, now).await?;
        Ok(token.token)
    }

    /// Unconditionally fetches and stores a new token.
    pub async fn refresh_token(&self) -> Result<CachedToken, PaymentError> {
        let settings = self.settings().await?;
        self.refresh_with(&settings.credentials, Timestamp::now())
            .await
    }

    /// Current merchant credentials.
    pub async fn credentials(&self) -> Result<PaymobCredentials, PaymentError> {
        Ok(self.settings().await?.credentials)
    }

    async fn settings(&self) -> Result<PaymobSettings, PaymentError> {
        self.credential_store
            .load()
            .await?
            .ok_or(PaymentError::CredentialsMissing)
    }

    async fn refresh_with(
        &self,
        credentials: &PaymobCredentials,
        now: Timestamp,
    ) -> Result<CachedToken, PaymentError> {
        let auth = self
            .gateway
            .authenticate(&credentials.api_key)
            .await
            .map_err(|e| {
                error!(
                    kind = %e.kind,
                    status_code = ?e.status_code,
                    error = %e.message,
                    "Paymob authentication failed"
                );
                PaymentError::Gateway(e)
            })?;

        let cached = CachedToken::new(auth.token, now.plus_minutes(self.policy.ttl_minutes));
        self.credential_store.save_token(&cached).await?;

        info!(expires_at = %cached.expires_at.as_datetime(), "Paymob auth token refreshed");
        Ok(cached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCredentialStore;
    use crate::application::handlers::payment::testing::MockGatewayClient;
    use crate::domain::payment::test_support::credentials;
    use secrecy::ExposeSecret;

    fn fixed_now() -> Timestamp {
        let dt = chrono::DateTime::parse_from_rfc3339("2024-06-13T10:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        Timestamp::from_datetime(dt)
    }

    fn setup() -> (TokenStore, Arc<InMemoryCredentialStore>, Arc<MockGatewayClient>) {
        let store = Arc::new(InMemoryCredentialStore::with_credentials(credentials()));
        let gateway = Arc::new(MockGatewayClient::new());
        let tokens = TokenStore::new(store.clone(), gateway.clone(), TokenPolicy::default());
        (tokens, store, gateway)
    }

    #[tokio::test]
    async fn first_call_authenticates_and_persists() {
        let (tokens, store, gateway) = setup();

        let token = tokens.get_valid_token_at(fixed_now()).await.unwrap();

        assert_eq!(token.expose_secret(), "auth-token-1");
        assert_eq!(gateway.auth_calls(), 1);
        let saved = store.load().await.unwrap().unwrap().token.unwrap();
        assert_eq!(saved.expires_at, fixed_now().plus_minutes(50));
    }

    #[tokio::test]
    async fn reuses_token_within_48_minutes() {
        let (tokens, _store, gateway) = setup();
        let now = fixed_now();

        tokens.get_valid_token_at(now).await.unwrap();
        for minute in [1, 10, 30, 47] {
            let token = tokens.get_valid_token_at(now.plus_minutes(minute)).await.unwrap();
            assert_eq!(token.expose_secret(), "auth-token-1");
        }

        assert_eq!(gateway.auth_calls(), 1);
    }

    #[tokio::test]
    async fn refreshes_inside_buffer() {
        let (tokens, _store, gateway) = setup();
        let now = fixed_now();

        tokens.get_valid_token_at(now).await.unwrap();
        let token = tokens.get_valid_token_at(now.plus_minutes(49)).await.unwrap();

        assert_eq!(token.expose_secret(), "auth-token-2");
        assert_eq!(gateway.auth_calls(), 2);
    }

    #[tokio::test]
    async fn refreshes_exactly_once_after_expiry() {
        let (tokens, _store, gateway) = setup();
        let now = fixed_now();

        tokens.get_valid_token_at(now).await.unwrap();
        let later = now.plus_minutes(51);
        tokens.get_valid_token_at(later).await.unwrap();
        tokens.get_valid_token_at(later.plus_minutes(1)).await.unwrap();

        assert_eq!(gateway.auth_calls(), 2);
    }

    #[tokio::test]
    async fn refresh_token_always_authenticates() {
        let (tokens, _store, gateway) = setup();

        tokens.get_valid_token_at(fixed_now()).await.unwrap();
        let refreshed = tokens.refresh_token().await.unwrap();

        assert_eq!(refreshed.token.expose_secret(), "auth-token-2");
        assert_eq!(gateway.auth_calls(), 2);
    }

    #[tokio::test]
    async fn missing_credentials_is_reported() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let gateway = Arc::new(MockGatewayClient::new());
        let tokens = TokenStore::new(store, gateway.clone(), TokenPolicy::default());

        let result = tokens.get_valid_token().await;

        assert!(matches!(result, Err(PaymentError::CredentialsMissing)));
        assert_eq!(gateway.auth_calls(), 0);
    }

    #[tokio::test]
    async fn auth_failure_does_not_store_token() {
        let (tokens, store, gateway) = setup();
        gateway.fail_auth();

        let result = tokens.get_valid_token_at(fixed_now()).await;

        assert!(matches!(result, Err(PaymentError::Gateway(_))));
        assert!(store.load().await.unwrap().unwrap().token.is_none());
    }
}
