//! Paymob gateway configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::TokenPolicy;
use crate::domain::payment::CredentialsUpdate;

/// Paymob gateway configuration.
///
/// The credential fields are an optional seed: when set, they are written to
/// the credential store at startup. Leave them unset to manage credentials
/// only through the settings endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymobConfig {
    /// API root, e.g. `https://accept.paymob.com/api`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Upper bound on the payment-authorized hook, in seconds
    #[serde(default = "default_hook_timeout")]
    pub hook_timeout_secs: u64,

    /// Lifetime assumed for a freshly issued auth token
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,

    /// Tokens this close to expiry are refreshed
    #[serde(default = "default_refresh_buffer")]
    pub token_refresh_buffer_minutes: i64,

    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Lifetime of a payment key in seconds
    #[serde(default = "default_key_expiration")]
    pub payment_key_expiration_secs: u32,

    pub api_key: Option<SecretString>,
    pub secret_key: Option<SecretString>,
    pub public_key: Option<SecretString>,
    pub hmac_secret: Option<SecretString>,
    pub iframe_id: Option<String>,
    pub integration_id: Option<i64>,
}

impl PaymobConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn hook_timeout(&self) -> Duration {
        Duration::from_secs(self.hook_timeout_secs)
    }

    pub fn token_policy(&self) -> TokenPolicy {
        TokenPolicy {
            ttl_minutes: self.token_ttl_minutes,
            refresh_buffer_minutes: self.token_refresh_buffer_minutes,
        }
    }

    /// Credential seed from the environment, if any field was provided.
    pub fn credential_seed(&self) -> Option<CredentialsUpdate> {
        let update = CredentialsUpdate {
            api_key: self.api_key.clone(),
            secret_key: self.secret_key.clone(),
            public_key: self.public_key.clone(),
            hmac_secret: self.hmac_secret.clone(),
            iframe_id: self.iframe_id.clone(),
            integration_id: self.integration_id,
        };
        (!update.is_empty()).then_some(update)
    }

    /// Validate gateway configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        let url = url::Url::parse(&self.api_base_url)
            .map_err(|_| ValidationError::InvalidGatewayUrl)?;
        match url.scheme() {
            "https" => {}
            "http" if !production => {}
            "http" => return Err(ValidationError::GatewayUrlMustBeHttps),
            _ => return Err(ValidationError::InvalidGatewayUrl),
        }

        if self.request_timeout_secs == 0 || self.hook_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.token_ttl_minutes <= 0
            || self.token_refresh_buffer_minutes < 0
            || self.token_refresh_buffer_minutes >= self.token_ttl_minutes
        {
            return Err(ValidationError::InvalidTokenPolicy);
        }
        if self.default_currency.len() != 3
            || !self.default_currency.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(ValidationError::InvalidCurrency(
                self.default_currency.clone(),
            ));
        }
        if self.payment_key_expiration_secs == 0 {
            return Err(ValidationError::InvalidKeyExpiration);
        }
        Ok(())
    }
}

impl Default for PaymobConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout(),
            hook_timeout_secs: default_hook_timeout(),
            token_ttl_minutes: default_token_ttl(),
            token_refresh_buffer_minutes: default_refresh_buffer(),
            default_currency: default_currency(),
            payment_key_expiration_secs: default_key_expiration(),
            api_key: None,
            secret_key: None,
            public_key: None,
            hmac_secret: None,
            iframe_id: None,
            integration_id: None,
        }
    }
}

fn default_api_base_url() -> String {
    "https://accept.paymob.com/api".to_string()
}

fn default_request_timeout() -> u64 {
    90
}

fn default_hook_timeout() -> u64 {
    30
}

fn default_token_ttl() -> i64 {
    50
}

fn default_refresh_buffer() -> i64 {
    2
}

fn default_currency() -> String {
    "EGP".to_string()
}

fn default_key_expiration() -> u32 {
    3600
}
