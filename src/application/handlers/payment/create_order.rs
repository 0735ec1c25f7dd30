//! CreateOrderHandler - Command handler for registering a Paymob order.
//!
//! The tracked request is written before the gateway is contacted, so every
//! attempt leaves a record even when the gateway call fails.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{error, info};

use crate::application::TokenStore;
use crate::domain::foundation::{GatewayOrderId, TrackedRequestId};
use crate::domain::payment::{MerchantReference, PaymentError, TrackedRequest};
use crate::ports::{
    CreateOrderRequest, GatewayClient, GatewayOrder, IntegrationRequestRepository, OrderItem,
    UpdateResult,
};

/// Command to create a gateway order.
#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    pub reference: MerchantReference,
    /// Amount in minor units.
    pub amount_cents: i64,
    /// Falls back to the configured default currency.
    pub currency: Option<String>,
    pub delivery_needed: bool,
    pub items: Vec<OrderItem>,
    pub redirect_to: Option<String>,
    /// Extra caller data stored on the tracked request.
    pub data: Map<String, Value>,
}

/// Result of a successful order creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderResult {
    pub order_id: GatewayOrderId,
    pub tracked_request_id: TrackedRequestId,
}

pub struct CreateOrderHandler {
    repository: Arc<dyn IntegrationRequestRepository>,
    tokens: Arc<TokenStore>,
    gateway: Arc<dyn GatewayClient>,
    default_currency: String,
}

impl CreateOrderHandler {
    pub fn new(
        repository: Arc<dyn IntegrationRequestRepository>,
        tokens: Arc<TokenStore>,
        gateway: Arc<dyn GatewayClient>,
        default_currency: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            tokens,
            gateway,
            default_currency: default_currency.into(),
        }
    }

    pub async fn handle(&self, cmd: CreateOrderCommand) -> Result<CreateOrderResult, PaymentError> {
        if cmd.amount_cents <= 0 {
            return Err(PaymentError::validation(
                "amount_cents",
                format!("must be positive, got {}", cmd.amount_cents),
            ));
        }

        let currency = cmd
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| self.default_currency.clone());

        // 1. Record the attempt
        let mut data = cmd.data;
        data.insert("reference_type".into(), json!(cmd.reference.reference_type));
        data.insert("reference_id".into(), json!(cmd.reference.reference_id));
        data.insert("amount_cents".into(), json!(cmd.amount_cents));
        data.insert("currency".into(), json!(currency));
        data.insert("delivery_needed".into(), json!(cmd.delivery_needed));
        data.insert("items".into(), json!(cmd.items));
        if let Some(redirect_to) = &cmd.redirect_to {
            data.insert("redirect_to".into(), json!(redirect_to));
        }

        let mut request = TrackedRequest::new(cmd.reference, cmd.redirect_to, data);
        self.repository.save(&request).await?;

        // 2. Register the order at the gateway
        let order = match self
            .register(&cmd.items, cmd.amount_cents, &currency, cmd.delivery_needed)
            .await
        {
            Ok(order) => order,
            Err(err) => return Err(self.fail(request, err).await),
        };

        // 3. Link the tracked request to the gateway order
        request.assign_gateway_order(order.id.clone());
        match self.repository.update(&request).await? {
            UpdateResult::Updated => {}
            UpdateResult::Conflict => {
                return Err(PaymentError::concurrent_modification(order.id.as_str()));
            }
        }

        info!(
            order_id = %order.id,
            tracked_request_id = %request.id,
            amount_cents = cmd.amount_cents,
            "Paymob order created"
        );

        Ok(CreateOrderResult {
            order_id: order.id,
            tracked_request_id: request.id,
        })
    }

    async fn register(
        &self,
        items: &[OrderItem],
        amount_cents: i64,
        currency: &str,
        delivery_needed: bool,
    ) -> Result<GatewayOrder, PaymentError> {
        let auth_token = self.tokens.get_valid_token().await?;
        let order = self
            .gateway
            .create_order(CreateOrderRequest {
                auth_token,
                delivery_needed,
                amount_cents,
                currency: currency.to_string(),
                items: items.to_vec(),
            })
            .await?;
        Ok(order)
    }

    /// Marks the request Failed and hands back the original error.
    async fn fail(&self, mut request: TrackedRequest, err: PaymentError) -> PaymentError {
        error!(tracked_request_id = %request.id, error = %err, "Could not create Paymob order");

        if request.mark_failed(err.to_string()).is_ok() {
            if let Err(e) = self.repository.update(&request).await {
                error!(
                    tracked_request_id = %request.id,
                    error = %e,
                    "Failed to record order failure"
                );
            }
        }
        err
    }
}
