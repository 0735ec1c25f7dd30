//! Gateway client port for the Paymob Accept API.
//!
//! One method per gateway call, each with typed request and response
//! structs. Implementations perform no retries; failures are classified into
//! a [`GatewayError`] and handed back to the caller.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::GatewayOrderId;
pub use crate::domain::payment::{GatewayError, GatewayErrorKind};

/// Port for the payment gateway's HTTP API.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Exchange the merchant API key for a bearer token.
    async fn authenticate(&self, api_key: &SecretString) -> Result<AuthToken, GatewayError>;

    /// Register an order and return the gateway's order id.
    async fn create_order(&self, request: CreateOrderRequest)
        -> Result<GatewayOrder, GatewayError>;

    /// Obtain a payment key for the hosted payment iframe.
    async fn create_payment_key(
        &self,
        request: PaymentKeyRequest,
    ) -> Result<PaymentKey, GatewayError>;
}

/// Bearer token returned by authentication.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: SecretString,
}

/// A line item on a gateway order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub amount_cents: i64,
    #[serde(default)]
    pub description: String,
    pub quantity: u32,
}

/// Request to create an order.
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    pub auth_token: SecretString,
    pub delivery_needed: bool,
    /// Amount in minor units (piasters for EGP).
    pub amount_cents: i64,
    pub currency: String,
    pub items: Vec<OrderItem>,
}

/// Order as registered at the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOrder {
    pub id: GatewayOrderId,
    pub amount_cents: Option<i64>,
    pub currency: Option<String>,
}

/// Billing details required by the payment key call.
///
/// Paymob rejects blank fields, so unknown values are sent as `NA`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingData {
    pub apartment: String,
    pub email: String,
    pub floor: String,
    pub first_name: String,
    pub street: String,
    pub building: String,
    pub phone_number: String,
    pub shipping_method: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub last_name: String,
    pub state: String,
}

/// Request for a payment key.
#[derive(Debug, Clone)]
pub struct PaymentKeyRequest {
    pub auth_token: SecretString,
    pub amount_cents: i64,
    /// Key lifetime in seconds.
    pub expiration: u32,
    pub order_id: GatewayOrderId,
    pub currency: String,
    pub billing_data: BillingData,
    pub integration_id: i64,
}

/// Payment key embedded in the iframe URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentKey {
    pub token: String,
}
