//! HandleCallbackHandler - Command handler for Paymob transaction callbacks.
//!
//! Verifies the callback HMAC, locates the tracked request for the gateway
//! order and applies the callback to it:
//!
//! | Callback | Effect |
//! |----------|--------|
//! | successful and `CAPTURED` | Pending -> Completed, success hook runs |
//! | successful, not captured | ids merged, stays Pending |
//! | not successful | ids merged, decline reason recorded, stays Pending |
//! | any, request already Completed | nothing written |
//!
//! Writes are versioned. When another delivery for the same order wins the
//! race, the request is re-read and the callback re-applied, so concurrent
//! deliveries complete a request at most once.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::TokenStore;
use crate::domain::foundation::{GatewayOrderId, TrackedRequestId};
use crate::domain::payment::{
    CallbackFacts, CallbackPayload, HmacValidator, PaymentError, SuccessRedirect, TrackedRequest,
};
use crate::ports::{IntegrationRequestRepository, UpdateResult};

use super::SuccessNotifier;

/// Attempts at writing the tracked request before giving up.
const MAX_ATTEMPTS: usize = 3;

/// Command carrying one raw callback delivery.
#[derive(Debug, Clone)]
pub struct HandleCallbackCommand {
    /// `hmac` from the query string or form body.
    pub hmac: Option<String>,
    /// Raw JSON body.
    pub body: Vec<u8>,
}

/// What a verified callback did to its tracked request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Payment captured; the request moved to Completed.
    Completed {
        tracked_request_id: TrackedRequestId,
        order_id: GatewayOrderId,
        redirect: SuccessRedirect,
    },
    /// Authorized but not yet captured; ids recorded, still Pending.
    AwaitingCapture {
        tracked_request_id: TrackedRequestId,
        order_id: GatewayOrderId,
    },
    /// The request was already Completed; nothing changed.
    AlreadyCompleted {
        tracked_request_id: TrackedRequestId,
        order_id: GatewayOrderId,
    },
    /// Payment not authorized; reason recorded, still Pending.
    Declined {
        tracked_request_id: TrackedRequestId,
        order_id: GatewayOrderId,
        reason: String,
    },
}

/// Result of applying a callback to one read of the tracked request.
enum Applied {
    Completed,
    AwaitingCapture,
    Declined(String),
}

pub struct HandleCallbackHandler {
    repository: Arc<dyn IntegrationRequestRepository>,
    tokens: Arc<TokenStore>,
    notifier: Arc<SuccessNotifier>,
}

impl HandleCallbackHandler {
    pub fn new(
        repository: Arc<dyn IntegrationRequestRepository>,
        tokens: Arc<TokenStore>,
        notifier: Arc<SuccessNotifier>,
    ) -> Self {
        Self {
            repository,
            tokens,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleCallbackCommand,
    ) -> Result<ReconcileOutcome, PaymentError> {
        // 1. Signature present
        let claimed = cmd
            .hmac
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| PaymentError::validation("hmac", "Missing HMAC"))?;

        // 2. Body parses and the signature matches
        let payload = CallbackPayload::from_json(&cmd.body)?;
        let credentials = self.tokens.credentials().await?;
        let validator = HmacValidator::new(credentials.hmac_secret);
        if !validator.is_valid(&payload, claimed) {
            warn!(
                order_id = ?payload.field_text("order.id"),
                transaction_id = ?payload.field_text("id"),
                "Rejected Paymob callback with invalid HMAC"
            );
            return Err(PaymentError::signature_invalid());
        }

        // 3. Facts the decision is based on
        let facts = payload.facts();
        let order_id = facts
            .order_id
            .as_deref()
            .ok_or_else(|| PaymentError::validation("order.id", "Missing order ID"))
            .and_then(|id| GatewayOrderId::new(id).map_err(PaymentError::from))?;

        // 4. Apply under optimistic concurrency
        for attempt in 1..=MAX_ATTEMPTS {
            let mut request = self
                .repository
                .find_latest_by_gateway_order_id(&order_id)
                .await?
                .ok_or_else(|| PaymentError::not_found(order_id.as_str()))?;

            if request.is_completed() {
                info!(
                    order_id = %order_id,
                    tracked_request_id = %request.id,
                    "Ignoring callback for already completed request"
                );
                return Ok(ReconcileOutcome::AlreadyCompleted {
                    tracked_request_id: request.id,
                    order_id,
                });
            }

            let applied = apply(&mut request, &facts, &order_id)?;

            match self.repository.update(&request).await? {
                UpdateResult::Updated => {
                    return Ok(self.finish(request, order_id, applied).await);
                }
                UpdateResult::Conflict => {
                    debug!(
                        order_id = %order_id,
                        attempt,
                        "Tracked request changed concurrently, retrying"
                    );
                }
            }
        }

        warn!(order_id = %order_id, "Gave up reconciling callback after repeated conflicts");
        Err(PaymentError::concurrent_modification(order_id.as_str()))
    }

    async fn finish(
        &self,
        request: TrackedRequest,
        order_id: GatewayOrderId,
        applied: Applied,
    ) -> ReconcileOutcome {
        match applied {
            Applied::Completed => {
                info!(
                    order_id = %order_id,
                    tracked_request_id = %request.id,
                    "Paymob payment captured, request completed"
                );
                let redirect = self.notifier.notify(&request).await;
                ReconcileOutcome::Completed {
                    tracked_request_id: request.id,
                    order_id,
                    redirect,
                }
            }
            Applied::AwaitingCapture => {
                info!(
                    order_id = %order_id,
                    tracked_request_id = %request.id,
                    "Paymob payment authorized, awaiting capture"
                );
                ReconcileOutcome::AwaitingCapture {
                    tracked_request_id: request.id,
                    order_id,
                }
            }
            Applied::Declined(reason) => {
                warn!(
                    order_id = %order_id,
                    tracked_request_id = %request.id,
                    reason = %reason,
                    "Paymob payment not authorized"
                );
                ReconcileOutcome::Declined {
                    tracked_request_id: request.id,
                    order_id,
                    reason,
                }
            }
        }
    }
}

/// Applies callback facts to a freshly read, not yet completed request.
fn apply(
    request: &mut TrackedRequest,
    facts: &CallbackFacts,
    order_id: &GatewayOrderId,
) -> Result<Applied, PaymentError> {
    request.record_callback_ids(facts.payment_id.as_deref(), order_id);

    if !facts.is_payment_successful() {
        let reason = facts.decline_reason();
        request.record_decline(reason.clone());
        return Ok(Applied::Declined(reason));
    }

    if !facts.is_captured() {
        return Ok(Applied::AwaitingCapture);
    }

    let current = request.status;
    request
        .complete()
        .map_err(|_| PaymentError::invalid_state(current.as_str(), "completed"))?;
    Ok(Applied::Completed)
}
