//! Gateway credentials and the cached bearer token.

use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::{Timestamp, ValidationError};

/// Merchant credentials issued by Paymob.
#[derive(Clone, Debug)]
pub struct PaymobCredentials {
    pub api_key: SecretString,
    pub secret_key: SecretString,
    pub public_key: SecretString,
    pub hmac_secret: SecretString,
    /// Hosted payment iframe id.
    pub iframe_id: String,
    /// Card integration id used for payment keys.
    pub integration_id: i64,
}

impl PaymobCredentials {
    /// Fails when a field needed to talk to the gateway is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::empty_field("api_key"));
        }
        if self.hmac_secret.expose_secret().trim().is_empty() {
            return Err(ValidationError::empty_field("hmac_secret"));
        }
        if self.iframe_id.trim().is_empty() {
            return Err(ValidationError::empty_field("iframe_id"));
        }
        if self.integration_id <= 0 {
            return Err(ValidationError::not_positive(
                "integration_id",
                self.integration_id,
            ));
        }
        Ok(())
    }
}

/// Bearer token obtained from `/auth/tokens`.
#[derive(Clone, Debug)]
pub struct CachedToken {
    pub token: SecretString,
    pub expires_at: Timestamp,
}

impl CachedToken {
    pub fn new(token: SecretString, expires_at: Timestamp) -> Self {
        Self { token, expires_at }
    }

    /// True while at least `buffer_minutes` of validity remain after `now`.
    pub fn is_usable_at(&self, now: Timestamp, buffer_minutes: i64) -> bool {
        now.plus_minutes(buffer_minutes).is_before(&self.expires_at)
    }
}

/// The singleton settings record: credentials plus the token cache.
#[derive(Clone, Debug)]
pub struct PaymobSettings {
    pub credentials: PaymobCredentials,
    pub token: Option<CachedToken>,
}

impl PaymobSettings {
    pub fn new(credentials: PaymobCredentials) -> Self {
        Self {
            credentials,
            token: None,
        }
    }
}

/// Partial credential update. `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct CredentialsUpdate {
    pub api_key: Option<SecretString>,
    pub secret_key: Option<SecretString>,
    pub public_key: Option<SecretString>,
    pub hmac_secret: Option<SecretString>,
    pub iframe_id: Option<String>,
    pub integration_id: Option<i64>,
}

impl CredentialsUpdate {
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none()
            && self.secret_key.is_none()
            && self.public_key.is_none()
            && self.hmac_secret.is_none()
            && self.iframe_id.is_none()
            && self.integration_id.is_none()
    }

    /// Applies the update to existing settings and drops the cached token.
    pub fn apply(self, mut settings: PaymobSettings) -> PaymobSettings {
        let creds = &mut settings.credentials;
        if let Some(v) = self.api_key {
            creds.api_key = v;
        }
        if let Some(v) = self.secret_key {
            creds.secret_key = v;
        }
        if let Some(v) = self.public_key {
            creds.public_key = v;
        }
        if let Some(v) = self.hmac_secret {
            creds.hmac_secret = v;
        }
        if let Some(v) = self.iframe_id {
            creds.iframe_id = v;
        }
        if let Some(v) = self.integration_id {
            creds.integration_id = v;
        }
        settings.token = None;
        settings
    }

    /// Builds first-time credentials. Every field must be present.
    pub fn into_credentials(self) -> Result<PaymobCredentials, ValidationError> {
        let credentials = PaymobCredentials {
            api_key: self
                .api_key
                .ok_or_else(|| ValidationError::empty_field("api_key"))?,
            secret_key: self
                .secret_key
                .unwrap_or_else(|| SecretString::new(String::new())),
            public_key: self
                .public_key
                .unwrap_or_else(|| SecretString::new(String::new())),
            hmac_secret: self
                .hmac_secret
                .ok_or_else(|| ValidationError::empty_field("hmac_secret"))?,
            iframe_id: self
                .iframe_id
                .ok_or_else(|| ValidationError::empty_field("iframe_id"))?,
            integration_id: self
                .integration_id
                .ok_or_else(|| ValidationError::empty_field("integration_id"))?,
        };
        credentials.validate()?;
        Ok(credentials)
    }
}
