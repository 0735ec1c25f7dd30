//! Mock ports shared by the payment handler tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::domain::foundation::GatewayOrderId;
use crate::domain::payment::{MerchantReference, RequestStatus};
use crate::ports::{
    AuthToken, CreateOrderRequest, GatewayClient, GatewayError, GatewayOrder, HookError,
    PaymentAuthorizedHook, PaymentKey, PaymentKeyRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Gateway
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct GatewayState {
    auth_calls: usize,
    fail_auth: bool,
    fail_orders: bool,
    fail_payment_keys: bool,
    order_requests: Vec<CreateOrderRequest>,
    payment_key_requests: Vec<PaymentKeyRequest>,
}

pub struct MockGatewayClient {
    order_id: String,
    state: Mutex<GatewayState>,
}

impl MockGatewayClient {
    pub fn new() -> Self {
        Self::with_order_id("999")
    }

    pub fn with_order_id(order_id: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            state: Mutex::new(GatewayState::default()),
        }
    }

    pub fn fail_auth(&self) {
        self.state.lock().unwrap().fail_auth = true;
    }

    pub fn fail_orders(&self) {
        self.state.lock().unwrap().fail_orders = true;
    }

    pub fn fail_payment_keys(&self) {
        self.state.lock().unwrap().fail_payment_keys = true;
    }

    pub fn auth_calls(&self) -> usize {
        self.state.lock().unwrap().auth_calls
    }

    pub fn order_requests(&self) -> Vec<CreateOrderRequest> {
        self.state.lock().unwrap().order_requests.clone()
    }

    pub fn payment_key_requests(&self) -> Vec<PaymentKeyRequest> {
        self.state.lock().unwrap().payment_key_requests.clone()
    }
}

#[async_trait]
impl GatewayClient for MockGatewayClient {
    async fn authenticate(&self, _api_key: &SecretString) -> Result<AuthToken, GatewayError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_auth {
            return Err(GatewayError::http(401, r#"{"detail":"incorrect credentials"}"#));
        }
        state.auth_calls += 1;
        Ok(AuthToken {
            token: SecretString::new(format!("auth-token-{}", state.auth_calls)),
        })
    }

    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<GatewayOrder, GatewayError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_orders {
            return Err(GatewayError::network("connection reset by peer"));
        }
        let order = GatewayOrder {
            id: GatewayOrderId::new(self.order_id.clone()).unwrap(),
            amount_cents: Some(request.amount_cents),
            currency: Some(request.currency.clone()),
        };
        state.order_requests.push(request);
        Ok(order)
    }

    async fn create_payment_key(
        &self,
        request: PaymentKeyRequest,
    ) -> Result<PaymentKey, GatewayError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_payment_keys {
            return Err(GatewayError::http(400, r#"{"billing_data":["required"]}"#));
        }
        state.payment_key_requests.push(request);
        Ok(PaymentKey {
            token: "pk_token_abc".to_string(),
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Hook
// ════════════════════════════════════════════════════════════════════════════

pub struct RecordingHook {
    calls: Mutex<Vec<(MerchantReference, RequestStatus)>>,
    response: Result<Option<String>, HookError>,
    delay: Option<Duration>,
}

impl RecordingHook {
    pub fn new() -> Self {
        Self::returning(Ok(None))
    }

    pub fn returning(response: Result<Option<String>, HookError>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response,
            delay: None,
        }
    }

    /// Sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<(MerchantReference, RequestStatus)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentAuthorizedHook for RecordingHook {
    async fn on_payment_authorized(
        &self,
        reference: &MerchantReference,
        status: RequestStatus,
    ) -> Result<Option<String>, HookError> {
        self.calls.lock().unwrap().push((reference.clone(), status));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }
}
