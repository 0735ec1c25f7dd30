//! HTTP DTOs for the Paymob endpoints.
//!
//! These types define the JSON request/response structure of the API and
//! convert into application commands.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::{
    BuildPaymentUrlCommand, BuildPaymentUrlResult, CreateOrderCommand, CreateOrderResult,
};
use crate::domain::payment::{CachedToken, CredentialsUpdate, MerchantReference, PaymentError};
use crate::ports::OrderItem;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to register a gateway order for a merchant document.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub reference_type: String,
    pub reference_id: String,
    /// Amount in minor units (piasters for EGP).
    pub amount_cents: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub delivery_needed: bool,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub redirect_to: Option<String>,
    /// Opaque caller data kept on the tracked request.
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl CreateOrderRequest {
    pub fn into_command(self) -> Result<CreateOrderCommand, PaymentError> {
        Ok(CreateOrderCommand {
            reference: MerchantReference::new(self.reference_type, self.reference_id)?,
            amount_cents: self.amount_cents,
            currency: self.currency,
            delivery_needed: self.delivery_needed,
            items: self.items,
            redirect_to: self.redirect_to,
            data: self.data,
        })
    }
}

/// Request for a hosted payment page URL.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentUrlRequest {
    pub order_id: String,
    pub amount_cents: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payer_name: String,
    #[serde(default)]
    pub payer_email: String,
}

impl From<PaymentUrlRequest> for BuildPaymentUrlCommand {
    fn from(req: PaymentUrlRequest) -> Self {
        Self {
            order_id: req.order_id,
            amount_cents: req.amount_cents,
            currency: req.currency,
            payer_name: req.payer_name,
            payer_email: req.payer_email,
        }
    }
}

/// Admin credential update. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default)]
    pub secret_key: Option<SecretString>,
    #[serde(default)]
    pub public_key: Option<SecretString>,
    #[serde(default)]
    pub hmac_secret: Option<SecretString>,
    #[serde(default)]
    pub iframe_id: Option<String>,
    #[serde(default)]
    pub integration_id: Option<i64>,
}

impl From<UpdateSettingsRequest> for CredentialsUpdate {
    fn from(req: UpdateSettingsRequest) -> Self {
        Self {
            api_key: req.api_key,
            secret_key: req.secret_key,
            public_key: req.public_key,
            hmac_secret: req.hmac_secret,
            iframe_id: req.iframe_id,
            integration_id: req.integration_id,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub tracked_request_id: String,
}

impl From<CreateOrderResult> for CreateOrderResponse {
    fn from(result: CreateOrderResult) -> Self {
        Self {
            order_id: result.order_id.to_string(),
            tracked_request_id: result.tracked_request_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentUrlResponse {
    pub payment_url: String,
}

impl From<BuildPaymentUrlResult> for PaymentUrlResponse {
    fn from(result: BuildPaymentUrlResult) -> Self {
        Self {
            payment_url: result.payment_url,
        }
    }
}

/// Plain acknowledgement message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Result of a forced token refresh. The token itself is never returned.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRefreshResponse {
    pub expires_at: String,
}

impl From<&CachedToken> for TokenRefreshResponse {
    fn from(token: &CachedToken) -> Self {
        Self {
            expires_at: token.expires_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Body of every callback response.
#[derive(Debug, Clone, Serialize)]
pub struct CallbackAck {
    pub received: bool,
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[test]
    fn create_order_request_fills_defaults() {
        let req: CreateOrderRequest = serde_json::from_value(json!({
            "reference_type": "Sales Invoice",
            "reference_id": "SINV-0001",
            "amount_cents": 15000
        }))
        .unwrap();

        assert!(req.currency.is_none());
        assert!(!req.delivery_needed);
        assert!(req.items.is_empty());
        assert!(req.data.is_empty());
    }

    #[test]
    fn create_order_request_rejects_blank_reference() {
        let req: CreateOrderRequest = serde_json::from_value(json!({
            "reference_type": "Sales Invoice",
            "reference_id": "  ",
            "amount_cents": 15000
        }))
        .unwrap();

        assert!(matches!(
            req.into_command(),
            Err(PaymentError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn create_order_request_parses_items() {
        let req: CreateOrderRequest = serde_json::from_value(json!({
            "reference_type": "Sales Order",
            "reference_id": "SO-7",
            "amount_cents": 5000,
            "items": [{"name": "Mug", "amount_cents": 2500, "quantity": 2}]
        }))
        .unwrap();

        let cmd = req.into_command().unwrap();
        assert_eq!(cmd.items.len(), 1);
        assert_eq!(cmd.items[0].quantity, 2);
        assert_eq!(cmd.reference.reference_id, "SO-7");
    }

    #[test]
    fn settings_request_converts_to_partial_update() {
        let req: UpdateSettingsRequest =
            serde_json::from_value(json!({"hmac_secret": "new-secret"})).unwrap();
        let update = CredentialsUpdate::from(req);

        assert_eq!(update.hmac_secret.unwrap().expose_secret(), "new-secret");
        assert!(update.api_key.is_none());
        assert!(update.integration_id.is_none());
    }

    #[test]
    fn error_response_serializes_code_and_message() {
        let body = serde_json::to_value(ErrorResponse::new("GATEWAY_ERROR", "nope")).unwrap();
        assert_eq!(body, json!({"code": "GATEWAY_ERROR", "message": "nope"}));
    }
}
