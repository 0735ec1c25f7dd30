//! Paymob Accept HTTP client.
//!
//! Implements the `GatewayClient` port over reqwest. Every call is a JSON
//! POST with a bounded timeout, and every failure is classified:
//!
//! | Outcome | Kind |
//! |---------|------|
//! | no response (connect, TLS, timeout) | `NetworkError` |
//! | non-2xx status | `HttpError` (body kept as payload) |
//! | 2xx with unexpected body | `JsonDecodeError` |
//! | request could not be built | `UnhandledError` |
//!
//! No retries happen here.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::foundation::GatewayOrderId;
use crate::ports::{
    AuthToken, CreateOrderRequest, GatewayClient, GatewayError, GatewayOrder, PaymentKey,
    PaymentKeyRequest,
};

use super::api_types::{
    AuthRequestBody, AuthResponseBody, OrderRequestBody, OrderResponseBody, PaymentKeyRequestBody,
    PaymentKeyResponseBody,
};
use super::urls::{Endpoint, PaymobUrls};

/// Default timeout for gateway calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

/// Paymob client configuration.
#[derive(Debug, Clone)]
pub struct PaymobClientConfig {
    urls: PaymobUrls,
    timeout: Duration,
}

impl PaymobClientConfig {
    pub fn new(urls: PaymobUrls) -> Self {
        Self {
            urls,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.urls = PaymobUrls::new(url);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for PaymobClientConfig {
    fn default() -> Self {
        Self::new(PaymobUrls::default())
    }
}

pub struct PaymobClient {
    config: PaymobClientConfig,
    http_client: reqwest::Client,
}

impl PaymobClient {
    pub fn new(config: PaymobClientConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::unhandled(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    async fn post<B, R>(&self, endpoint: Endpoint, body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.config.urls.get_url(endpoint);

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let err = classify_send_error(&e);
                tracing::error!(
                    endpoint = endpoint.name(),
                    kind = %err.kind,
                    error = %e,
                    "Paymob request failed"
                );
                err
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::error!(
                endpoint = endpoint.name(),
                status = status.as_u16(),
                payload = %text,
                "Paymob returned an error status"
            );
            return Err(GatewayError::http(status.as_u16(), text));
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                endpoint = endpoint.name(),
                error = %e,
                "Failed to parse Paymob response"
            );
            GatewayError::json_decode(format!("Failed to parse Paymob response: {}", e), text)
                .with_status(status.as_u16())
        })
    }
}

fn classify_send_error(e: &reqwest::Error) -> GatewayError {
    if e.is_builder() {
        GatewayError::unhandled(e.to_string())
    } else if e.is_timeout() || e.is_connect() || e.is_request() {
        GatewayError::network(e.to_string())
    } else {
        GatewayError::unhandled(e.to_string())
    }
}

#[async_trait]
impl GatewayClient for PaymobClient {
    async fn authenticate(&self, api_key: &SecretString) -> Result<AuthToken, GatewayError> {
        let body = AuthRequestBody {
            api_key: api_key.expose_secret(),
        };
        let response: AuthResponseBody = self.post(Endpoint::Auth, &body).await?;
        Ok(AuthToken {
            token: SecretString::new(response.token),
        })
    }

    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<GatewayOrder, GatewayError> {
        let body = OrderRequestBody {
            auth_token: request.auth_token.expose_secret(),
            delivery_needed: request.delivery_needed.to_string(),
            amount_cents: request.amount_cents.to_string(),
            currency: &request.currency,
            items: &request.items,
        };
        let response: OrderResponseBody = self.post(Endpoint::Order, &body).await?;

        let id = GatewayOrderId::new(response.id).map_err(|e| {
            GatewayError::json_decode(format!("Invalid order id: {}", e), String::new())
        })?;
        Ok(GatewayOrder {
            id,
            amount_cents: response.amount_cents,
            currency: response.currency,
        })
    }

    async fn create_payment_key(
        &self,
        request: PaymentKeyRequest,
    ) -> Result<PaymentKey, GatewayError> {
        let body = PaymentKeyRequestBody {
            auth_token: request.auth_token.expose_secret(),
            amount_cents: request.amount_cents.to_string(),
            expiration: request.expiration,
            order_id: request.order_id.as_str(),
            currency: &request.currency,
            billing_data: &request.billing_data,
            integration_id: request.integration_id,
        };
        let response: PaymentKeyResponseBody = self.post(Endpoint::PaymentKey, &body).await?;
        Ok(PaymentKey {
            token: response.token,
        })
    }
}
