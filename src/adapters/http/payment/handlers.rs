//! HTTP handlers for the Paymob endpoints.
//!
//! These handlers connect Axum routes to the application command handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use tracing::{debug, error, warn};
use url::form_urlencoded;

use crate::application::{
    BuildPaymentUrlHandler, CreateOrderHandler, HandleCallbackCommand, HandleCallbackHandler,
    PaymentUrlSettings, ReconcileOutcome, SuccessNotifier, TokenPolicy, TokenStore,
    UpdateCredentialsCommand, UpdateCredentialsHandler,
};
use crate::domain::payment::PaymentError;
use crate::ports::{
    CredentialStore, GatewayClient, IntegrationRequestRepository, PaymentAuthorizedHook,
};

use super::dto::{
    CallbackAck, CreateOrderRequest, CreateOrderResponse, ErrorResponse, MessageResponse,
    PaymentUrlRequest, PaymentUrlResponse, TokenRefreshResponse, UpdateSettingsRequest,
};

/// Public message for order creation failures.
pub const ORDER_FAILED: &str = "Could not create Paymob order";
/// Public message for payment URL failures.
pub const PAYMENT_URL_FAILED: &str = "Could not generate Paymob payment URL";
/// Public message for credential update failures.
pub const CREDENTIALS_FAILED: &str = "Failed to Update Paymob Credentials";
/// Public message for forced token refresh failures.
pub const TOKEN_REFRESH_FAILED: &str = "Could not refresh Paymob access token";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the Paymob routes.
#[derive(Clone)]
pub struct PaymentAppState {
    pub repository: Arc<dyn IntegrationRequestRepository>,
    pub credential_store: Arc<dyn CredentialStore>,
    pub gateway: Arc<dyn GatewayClient>,
    pub tokens: Arc<TokenStore>,
    pub notifier: Arc<SuccessNotifier>,
    pub url_settings: PaymentUrlSettings,
}

impl PaymentAppState {
    pub fn new(
        repository: Arc<dyn IntegrationRequestRepository>,
        credential_store: Arc<dyn CredentialStore>,
        gateway: Arc<dyn GatewayClient>,
        hook: Arc<dyn PaymentAuthorizedHook>,
        token_policy: TokenPolicy,
        url_settings: PaymentUrlSettings,
    ) -> Self {
        let tokens = Arc::new(TokenStore::new(
            credential_store.clone(),
            gateway.clone(),
            token_policy,
        ));
        Self {
            repository,
            credential_store,
            gateway,
            tokens,
            notifier: Arc::new(SuccessNotifier::new(hook)),
            url_settings,
        }
    }

    /// Replaces the default notifier, e.g. to change the hook timeout.
    pub fn with_notifier(mut self, notifier: SuccessNotifier) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    pub fn create_order_handler(&self) -> CreateOrderHandler {
        CreateOrderHandler::new(
            self.repository.clone(),
            self.tokens.clone(),
            self.gateway.clone(),
            self.url_settings.default_currency.clone(),
        )
    }

    pub fn payment_url_handler(&self) -> BuildPaymentUrlHandler {
        BuildPaymentUrlHandler::new(
            self.tokens.clone(),
            self.gateway.clone(),
            self.url_settings.clone(),
        )
    }

    pub fn callback_handler(&self) -> HandleCallbackHandler {
        HandleCallbackHandler::new(
            self.repository.clone(),
            self.tokens.clone(),
            self.notifier.clone(),
        )
    }

    pub fn update_credentials_handler(&self) -> UpdateCredentialsHandler {
        UpdateCredentialsHandler::new(self.credential_store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Gateway Callback
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/paymob/callback - Transaction processed callback
///
/// Always answers 200: the gateway retries anything else, and a rejected
/// callback will not become valid on retry.
pub async fn paymob_callback(
    State(state): State<PaymentAppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let cmd = HandleCallbackCommand {
        hmac: claimed_hmac(query.as_deref(), &headers, &body),
        body: body.to_vec(),
    };

    // Reconciliation runs on its own task so a dropped connection cannot
    // cancel it between the Completed write and the notifier.
    let handler = state.callback_handler();
    let result = match tokio::spawn(async move { handler.handle(cmd).await }).await {
        Ok(result) => result,
        Err(e) => {
            let err = PaymentError::infrastructure(e.to_string());
            error!(code = %err.code(), error = %err, "Paymob callback task aborted");
            return (StatusCode::OK, Json(CallbackAck { received: true }));
        }
    };

    match result {
        Ok(outcome) => log_outcome(&outcome),
        Err(e) => match e {
            PaymentError::ValidationFailed { .. }
            | PaymentError::SignatureInvalid
            | PaymentError::NotFound(_) => {
                warn!(code = %e.code(), error = %e, "Paymob callback rejected")
            }
            _ => error!(code = %e.code(), error = %e, "Paymob callback error"),
        },
    }

    (StatusCode::OK, Json(CallbackAck { received: true }))
}

fn log_outcome(outcome: &ReconcileOutcome) {
    let (order_id, outcome) = match outcome {
        ReconcileOutcome::Completed { order_id, .. } => (order_id, "completed"),
        ReconcileOutcome::AwaitingCapture { order_id, .. } => (order_id, "awaiting_capture"),
        ReconcileOutcome::AlreadyCompleted { order_id, .. } => (order_id, "already_completed"),
        ReconcileOutcome::Declined { order_id, .. } => (order_id, "declined"),
    };
    debug!(order_id = %order_id, outcome, "Paymob callback processed");
}

/// `hmac` from the query string, falling back to a form body when the query
/// has none or an empty one.
fn claimed_hmac(query: Option<&str>, headers: &HeaderMap, body: &[u8]) -> Option<String> {
    query
        .and_then(|q| param(q.as_bytes(), "hmac"))
        .filter(|h| !h.is_empty())
        .or_else(|| form_hmac(headers, body))
}

fn param(input: &[u8], name: &str) -> Option<String> {
    form_urlencoded::parse(input)
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// `hmac` from a form-encoded body, if the request carries one.
fn form_hmac(headers: &HeaderMap, body: &[u8]) -> Option<String> {
    let is_form = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
    if is_form {
        param(body, "hmac")
    } else {
        None
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Checkout Commands
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/paymob/orders - Register a gateway order
pub async fn create_order(
    State(state): State<PaymentAppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let cmd = request
        .into_command()
        .map_err(|e| PaymentApiError::new(e, ORDER_FAILED))?;

    let result = state
        .create_order_handler()
        .handle(cmd)
        .await
        .map_err(|e| PaymentApiError::new(e, ORDER_FAILED))?;

    Ok((StatusCode::CREATED, Json(CreateOrderResponse::from(result))))
}

/// POST /api/paymob/payment-url - Build the hosted iframe URL
pub async fn payment_url(
    State(state): State<PaymentAppState>,
    Json(request): Json<PaymentUrlRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let result = state
        .payment_url_handler()
        .handle(request.into())
        .await
        .map_err(|e| PaymentApiError::new(e, PAYMENT_URL_FAILED))?;

    Ok(Json(PaymentUrlResponse::from(result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Admin Commands
// ════════════════════════════════════════════════════════════════════════════════

/// PUT /api/paymob/settings - Replace stored credentials
pub async fn update_settings(
    State(state): State<PaymentAppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let cmd = UpdateCredentialsCommand {
        update: request.into(),
    };

    let result = state
        .update_credentials_handler()
        .handle(cmd)
        .await
        .map_err(|e| PaymentApiError::new(e, CREDENTIALS_FAILED))?;

    Ok(Json(MessageResponse {
        message: result.message,
    }))
}

/// POST /api/paymob/token/refresh - Force a new auth token
pub async fn refresh_token(
    State(state): State<PaymentAppState>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let token = state
        .tokens
        .refresh_token()
        .await
        .map_err(|e| PaymentApiError::new(e, TOKEN_REFRESH_FAILED))?;

    Ok(Json(TokenRefreshResponse::from(&token)))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error that converts payment errors to HTTP responses.
///
/// Caller mistakes are reported as-is. Everything else is logged and
/// answered with the endpoint's generic message so gateway and database
/// details never leave the service.
#[derive(Debug)]
pub struct PaymentApiError {
    error: PaymentError,
    public_message: &'static str,
}

impl PaymentApiError {
    pub fn new(error: impl Into<PaymentError>, public_message: &'static str) -> Self {
        Self {
            error: error.into(),
            public_message,
        }
    }

    pub fn error(&self) -> &PaymentError {
        &self.error
    }

    fn status(&self) -> StatusCode {
        match &self.error {
            PaymentError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            PaymentError::SignatureInvalid => StatusCode::UNAUTHORIZED,
            PaymentError::NotFound(_) => StatusCode::NOT_FOUND,
            PaymentError::CredentialsMissing => StatusCode::SERVICE_UNAVAILABLE,
            PaymentError::Gateway(_) => StatusCode::BAD_GATEWAY,
            PaymentError::InvalidState { .. } | PaymentError::ConcurrentModification(_) => {
                StatusCode::CONFLICT
            }
            PaymentError::Hook(_) | PaymentError::Infrastructure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match &self.error {
            PaymentError::ValidationFailed { .. } => self.error.message(),
            _ => {
                error!(code = %self.error.code(), error = %self.error, "{}", self.public_message);
                self.public_message.to_string()
            }
        };

        let body = ErrorResponse::new(self.error.code().to_string(), message);
        (status, Json(body)).into_response()
    }
}
