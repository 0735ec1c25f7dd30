//! BuildPaymentUrlHandler - Command handler for the hosted payment iframe URL.

use std::sync::Arc;

use tracing::{error, info};
use url::form_urlencoded;

use crate::application::TokenStore;
use crate::domain::foundation::GatewayOrderId;
use crate::domain::payment::PaymentError;
use crate::ports::{BillingData, GatewayClient, PaymentKeyRequest};

/// Placeholder for billing fields the payer never provides.
const NOT_AVAILABLE: &str = "NA";
const PLACEHOLDER_PHONE: &str = "+201111111111";
const DEFAULT_CITY: &str = "Cairo";
const DEFAULT_COUNTRY: &str = "EG";

/// Command to build a payment URL for an existing gateway order.
#[derive(Debug, Clone)]
pub struct BuildPaymentUrlCommand {
    pub order_id: String,
    pub amount_cents: i64,
    pub currency: Option<String>,
    pub payer_name: String,
    pub payer_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaymentUrlResult {
    pub payment_url: String,
}

/// Settings for payment key generation.
#[derive(Debug, Clone)]
pub struct PaymentUrlSettings {
    /// Base of the iframe URL, up to and excluding the iframe id.
    pub iframe_base_url: String,
    /// Payment key lifetime in seconds.
    pub key_expiration_secs: u32,
    pub default_currency: String,
}

pub struct BuildPaymentUrlHandler {
    tokens: Arc<TokenStore>,
    gateway: Arc<dyn GatewayClient>,
    settings: PaymentUrlSettings,
}

impl BuildPaymentUrlHandler {
    pub fn new(
        tokens: Arc<TokenStore>,
        gateway: Arc<dyn GatewayClient>,
        settings: PaymentUrlSettings,
    ) -> Self {
        Self {
            tokens,
            gateway,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: BuildPaymentUrlCommand,
    ) -> Result<BuildPaymentUrlResult, PaymentError> {
        let order_id = GatewayOrderId::new(cmd.order_id)?;
        if cmd.amount_cents <= 0 {
            return Err(PaymentError::validation(
                "amount_cents",
                format!("must be positive, got {}", cmd.amount_cents),
            ));
        }

        let credentials = self.tokens.credentials().await?;
        let auth_token = self.tokens.get_valid_token().await?;

        let currency = cmd
            .currency
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| self.settings.default_currency.clone());

        let key = self
            .gateway
            .create_payment_key(PaymentKeyRequest {
                auth_token,
                amount_cents: cmd.amount_cents,
                expiration: self.settings.key_expiration_secs,
                order_id: order_id.clone(),
                currency,
                billing_data: billing_data(&cmd.payer_name, &cmd.payer_email),
                integration_id: credentials.integration_id,
            })
            .await
            .map_err(|e| {
                error!(
                    order_id = %order_id,
                    kind = %e.kind,
                    status_code = ?e.status_code,
                    payload = ?e.payload,
                    "Could not generate Paymob payment URL"
                );
                PaymentError::Gateway(e)
            })?;

        info!(order_id = %order_id, "Paymob payment key issued");

        Ok(BuildPaymentUrlResult {
            payment_url: iframe_url(
                &self.settings.iframe_base_url,
                &credentials.iframe_id,
                &key.token,
            ),
        })
    }
}

/// Billing data with placeholders for everything but name and email.
pub fn billing_data(payer_name: &str, payer_email: &str) -> BillingData {
    let mut names = payer_name.split_whitespace();
    let first_name = names.next().unwrap_or(NOT_AVAILABLE).to_string();
    let last_name = names.last().map(str::to_string).unwrap_or_else(|| first_name.clone());
    let email = match payer_email.trim() {
        "" => NOT_AVAILABLE.to_string(),
        email => email.to_string(),
    };

    BillingData {
        apartment: NOT_AVAILABLE.to_string(),
        email,
        floor: NOT_AVAILABLE.to_string(),
        first_name,
        street: NOT_AVAILABLE.to_string(),
        building: NOT_AVAILABLE.to_string(),
        phone_number: PLACEHOLDER_PHONE.to_string(),
        shipping_method: NOT_AVAILABLE.to_string(),
        postal_code: NOT_AVAILABLE.to_string(),
        city: DEFAULT_CITY.to_string(),
        country: DEFAULT_COUNTRY.to_string(),
        last_name,
        state: NOT_AVAILABLE.to_string(),
    }
}

/// `<base>/<iframe_id>?payment_token=<token>`
pub fn iframe_url(base: &str, iframe_id: &str, payment_token: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("payment_token", payment_token)
        .finish();
    format!("{}/{}?{}", base.trim_end_matches('/'), iframe_id, query)
}
