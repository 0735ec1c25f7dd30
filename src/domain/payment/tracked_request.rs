//! Tracked request aggregate.
//!
//! A tracked request correlates one checkout attempt at the gateway with the
//! merchant object that started it. It is the only record the callback
//! pipeline mutates, and it is never deleted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{
    GatewayOrderId, StateMachine, Timestamp, TrackedRequestId, ValidationError,
};

use super::RequestStatus;

/// Data key holding the gateway order id written at order creation.
pub const DATA_KEY_GATEWAY_ORDER_ID: &str = "paymob_order_id";
/// Data key holding the gateway payment (transaction) id from a callback.
pub const DATA_KEY_PAYMENT_ID: &str = "paymob_payment_id";
/// Data key holding the order id echoed back by a callback.
pub const DATA_KEY_ORDER_ID: &str = "order_id";

/// Merchant-side object a payment belongs to (e.g. a sales invoice).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantReference {
    pub reference_type: String,
    pub reference_id: String,
}

impl MerchantReference {
    pub fn new(
        reference_type: impl Into<String>,
        reference_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let reference_type = reference_type.into();
        let reference_id = reference_id.into();
        if reference_type.trim().is_empty() {
            return Err(ValidationError::empty_field("reference_type"));
        }
        if reference_id.trim().is_empty() {
            return Err(ValidationError::empty_field("reference_id"));
        }
        Ok(Self {
            reference_type,
            reference_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedRequest {
    pub id: TrackedRequestId,
    pub reference: MerchantReference,
    /// Where the payer goes after a successful payment, unless a hook overrides it.
    pub redirect_to: Option<String>,
    /// Indexed copy of the gateway order id used for callback lookup.
    pub gateway_order_id: Option<GatewayOrderId>,
    pub status: RequestStatus,
    /// Free-form request data. Only ever merged into, never replaced.
    pub data: Map<String, Value>,
    pub error: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Optimistic concurrency version, bumped by the repository on every update.
    pub version: i32,
}

impl TrackedRequest {
    /// Creates a new pending request.
    pub fn new(
        reference: MerchantReference,
        redirect_to: Option<String>,
        data: Map<String, Value>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: TrackedRequestId::new(),
            reference,
            redirect_to,
            gateway_order_id: None,
            status: RequestStatus::Pending,
            data,
            error: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == RequestStatus::Completed
    }

    /// Merges entries into `data`, preserving keys that are not mentioned.
    pub fn merge_data<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        for (key, value) in entries {
            self.data.insert(key, value);
        }
        self.updated_at = Timestamp::now();
    }

    /// Records the order id the gateway assigned at creation.
    pub fn assign_gateway_order(&mut self, order_id: GatewayOrderId) {
        self.merge_data([(
            DATA_KEY_GATEWAY_ORDER_ID.to_string(),
            Value::String(order_id.as_str().to_string()),
        )]);
        self.gateway_order_id = Some(order_id);
    }

    /// Records the payment and order ids reported by a callback.
    pub fn record_callback_ids(&mut self, payment_id: Option<&str>, order_id: &GatewayOrderId) {
        let mut entries = vec![(
            DATA_KEY_ORDER_ID.to_string(),
            Value::String(order_id.as_str().to_string()),
        )];
        if let Some(payment_id) = payment_id {
            entries.push((
                DATA_KEY_PAYMENT_ID.to_string(),
                Value::String(payment_id.to_string()),
            ));
        }
        self.merge_data(entries);
    }

    /// Moves the request to Completed.
    pub fn complete(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(RequestStatus::Completed)?;
        self.error = None;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Records why an authorization was declined. The status is left untouched.
    pub fn record_decline(&mut self, reason: impl Into<String>) {
        self.error = Some(reason.into());
        self.updated_at = Timestamp::now();
    }

    /// Moves the request to Failed with the given reason.
    pub fn mark_failed(&mut self, reason: impl Into<String>) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(RequestStatus::Failed)?;
        self.error = Some(reason.into());
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference() -> MerchantReference {
        MerchantReference::new("Sales Invoice", "SINV-0001").unwrap()
    }

    fn request_with_data() -> TrackedRequest {
        let mut data = Map::new();
        data.insert("amount_cents".to_string(), json!(15000));
        data.insert("currency".to_string(), json!("EGP"));
        TrackedRequest::new(reference(), Some("/orders".to_string()), data)
    }

    #[test]
    fn new_request_is_pending_without_order() {
        let request = request_with_data();
        assert_eq!(request.status, RequestStatus::Pending);
        assert!(request.gateway_order_id.is_none());
        assert!(request.error.is_none());
        assert_eq!(request.version, 0);
    }

    #[test]
    fn merchant_reference_rejects_blank_fields() {
        assert!(MerchantReference::new("", "SINV-1").is_err());
        assert!(MerchantReference::new("Sales Invoice", "  ").is_err());
    }

    #[test]
    fn assign_gateway_order_sets_column_and_data() {
        let mut request = request_with_data();
        request.assign_gateway_order(GatewayOrderId::new("999").unwrap());

        assert_eq!(request.gateway_order_id.as_ref().unwrap().as_str(), "999");
        assert_eq!(request.data[DATA_KEY_GATEWAY_ORDER_ID], json!("999"));
    }

    #[test]
    fn record_callback_ids_is_additive() {
        let mut request = request_with_data();
        request.record_callback_ids(Some("p1"), &GatewayOrderId::new("999").unwrap());

        assert_eq!(request.data["amount_cents"], json!(15000));
        assert_eq!(request.data["currency"], json!("EGP"));
        assert_eq!(request.data[DATA_KEY_PAYMENT_ID], json!("p1"));
        assert_eq!(request.data[DATA_KEY_ORDER_ID], json!("999"));
    }

    #[test]
    fn record_callback_ids_skips_missing_payment_id() {
        let mut request = request_with_data();
        request.record_callback_ids(None, &GatewayOrderId::new("999").unwrap());

        assert!(!request.data.contains_key(DATA_KEY_PAYMENT_ID));
        assert_eq!(request.data[DATA_KEY_ORDER_ID], json!("999"));
    }

    #[test]
    fn complete_clears_previous_decline() {
        let mut request = request_with_data();
        request.record_decline("Payment Status: UNPAID, Response Code: DECLINED");
        request.complete().unwrap();

        assert!(request.is_completed());
        assert!(request.error.is_none());
    }

    #[test]
    fn complete_twice_is_rejected() {
        let mut request = request_with_data();
        request.complete().unwrap();
        assert!(request.complete().is_err());
        assert!(request.is_completed());
    }

    #[test]
    fn record_decline_keeps_pending() {
        let mut request = request_with_data();
        request.record_decline("declined");

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.error.as_deref(), Some("declined"));
    }

    #[test]
    fn mark_failed_from_pending() {
        let mut request = request_with_data();
        request.mark_failed("gateway unavailable").unwrap();

        assert_eq!(request.status, RequestStatus::Failed);
        assert_eq!(request.error.as_deref(), Some("gateway unavailable"));
    }

    #[test]
    fn mark_failed_after_completion_is_rejected() {
        let mut request = request_with_data();
        request.complete().unwrap();
        assert!(request.mark_failed("late failure").is_err());
        assert!(request.is_completed());
    }
}
