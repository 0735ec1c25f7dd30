//! Paymob transaction callback payload.
//!
//! Callbacks are untrusted JSON. Paymob wraps the transaction in an envelope
//! (`{"type": "TRANSACTION", "obj": {...}}`); redirects and older integrations
//! send the bare transaction object. Both forms are accepted and every lookup
//! is total, so a malformed payload yields missing facts rather than an error.

use serde_json::Value;

use crate::domain::foundation::ValidationError;

/// Capture status reported once funds have actually been captured.
pub const CAPTURED: &str = "CAPTURED";

/// A parsed callback body, narrowed to the transaction object.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackPayload {
    transaction: Value,
}

impl CallbackPayload {
    /// Parses a raw callback body.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidFormat` if the body is not valid JSON.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ValidationError::invalid_format("body", e.to_string()))?;
        Ok(Self::from_value(value))
    }

    /// Wraps an already-parsed body, unwrapping the `obj` envelope if present.
    pub fn from_value(value: Value) -> Self {
        let transaction = match value {
            Value::Object(mut map) if matches!(map.get("obj"), Some(Value::Object(_))) => {
                map.remove("obj").unwrap_or(Value::Null)
            }
            other => other,
        };
        Self { transaction }
    }

    /// Looks up a dotted path (`order.id`, `source_data.pan`) through nested objects.
    pub fn field(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.transaction, |current, segment| current.get(segment))
    }

    /// Renders a field as the gateway would when signing it.
    pub fn field_text(&self, path: &str) -> Option<String> {
        self.field(path).and_then(scalar_text)
    }

    /// Extracts the facts the reconciliation pipeline acts on.
    pub fn facts(&self) -> CallbackFacts {
        CallbackFacts {
            success: self.field("success").and_then(Value::as_bool),
            pending: self.field("pending").and_then(Value::as_bool),
            payment_status: self.field_text("order.payment_status"),
            txn_response_code: self.field_text("data.txn_response_code"),
            capture_status: self.field_text("data.migs_order.status"),
            payment_id: self.field_text("id"),
            order_id: self
                .field_text("order.id")
                .filter(|id| !id.trim().is_empty()),
        }
    }
}

/// Text form of a JSON scalar. Null, objects and arrays have none.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Facts derived from a callback. Not persisted verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackFacts {
    pub success: Option<bool>,
    pub pending: Option<bool>,
    pub payment_status: Option<String>,
    pub txn_response_code: Option<String>,
    pub capture_status: Option<String>,
    pub payment_id: Option<String>,
    pub order_id: Option<String>,
}

impl CallbackFacts {
    /// True when the gateway reports a settled, approved, paid transaction.
    pub fn is_payment_successful(&self) -> bool {
        self.success == Some(true)
            && self.pending == Some(false)
            && eq_upper(self.payment_status.as_deref(), "PAID")
            && eq_upper(self.txn_response_code.as_deref(), "APPROVED")
    }

    /// True when funds were captured, not merely authorized.
    pub fn is_captured(&self) -> bool {
        self.capture_status.as_deref() == Some(CAPTURED)
    }

    /// Human-readable decline description stored on the tracked request.
    pub fn decline_reason(&self) -> String {
        format!(
            "Payment Status: {}, Response Code: {}",
            self.payment_status.as_deref().unwrap_or("unknown"),
            self.txn_response_code.as_deref().unwrap_or("unknown"),
        )
    }
}

fn eq_upper(value: Option<&str>, expected: &str) -> bool {
    value.is_some_and(|v| v.to_uppercase() == expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn successful_transaction() -> Value {
        json!({
            "id": "p1",
            "success": true,
            "pending": false,
            "order": { "id": 999, "payment_status": "PAID" },
            "data": {
                "txn_response_code": "APPROVED",
                "migs_order": { "status": "CAPTURED" }
            }
        })
    }

    #[test]
    fn unwraps_obj_envelope() {
        let payload = CallbackPayload::from_value(json!({
            "type": "TRANSACTION",
            "obj": successful_transaction(),
        }));

        assert_eq!(payload.field_text("id").as_deref(), Some("p1"));
    }

    #[test]
    fn accepts_bare_transaction() {
        let payload = CallbackPayload::from_value(successful_transaction());
        assert_eq!(payload.field_text("order.id").as_deref(), Some("999"));
    }

    #[test]
    fn non_object_obj_is_not_unwrapped() {
        let payload = CallbackPayload::from_value(json!({ "obj": "oops", "id": 7 }));
        assert_eq!(payload.field_text("id").as_deref(), Some("7"));
    }

    #[test]
    fn from_json_rejects_invalid_json() {
        let result = CallbackPayload::from_json(b"not json");
        assert!(matches!(result, Err(ValidationError::InvalidFormat { .. })));
    }

    #[test]
    fn nested_lookup_through_missing_object_is_none() {
        let payload = CallbackPayload::from_value(json!({ "id": 1 }));
        assert!(payload.field("source_data.pan").is_none());
        assert!(payload.field("order.id").is_none());
    }

    #[test]
    fn nested_lookup_through_scalar_is_none() {
        let payload = CallbackPayload::from_value(json!({ "order": 5 }));
        assert!(payload.field("order.id").is_none());
    }

    #[test]
    fn scalar_text_renders_each_kind() {
        assert_eq!(scalar_text(&json!("abc")).as_deref(), Some("abc"));
        assert_eq!(scalar_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(scalar_text(&json!(false)).as_deref(), Some("false"));
        assert_eq!(scalar_text(&json!(10000)).as_deref(), Some("10000"));
        assert_eq!(scalar_text(&Value::Null), None);
        assert_eq!(scalar_text(&json!({"a": 1})), None);
    }

    #[test]
    fn facts_of_successful_capture() {
        let facts = CallbackPayload::from_value(successful_transaction()).facts();

        assert!(facts.is_payment_successful());
        assert!(facts.is_captured());
        assert_eq!(facts.payment_id.as_deref(), Some("p1"));
        assert_eq!(facts.order_id.as_deref(), Some("999"));
    }

    #[test]
    fn success_predicate_is_case_insensitive() {
        let facts = CallbackFacts {
            success: Some(true),
            pending: Some(false),
            payment_status: Some("paid".to_string()),
            txn_response_code: Some("approved".to_string()),
            ..Default::default()
        };
        assert!(facts.is_payment_successful());
    }

    #[test]
    fn pending_transaction_is_not_successful() {
        let facts = CallbackFacts {
            success: Some(true),
            pending: Some(true),
            payment_status: Some("PAID".to_string()),
            txn_response_code: Some("APPROVED".to_string()),
            ..Default::default()
        };
        assert!(!facts.is_payment_successful());
    }

    #[test]
    fn missing_pending_flag_is_not_successful() {
        let facts = CallbackFacts {
            success: Some(true),
            pending: None,
            payment_status: Some("PAID".to_string()),
            txn_response_code: Some("APPROVED".to_string()),
            ..Default::default()
        };
        assert!(!facts.is_payment_successful());
    }

    #[test]
    fn string_success_flag_is_not_true() {
        let payload = CallbackPayload::from_value(json!({ "success": "true", "pending": false }));
        assert_eq!(payload.facts().success, None);
    }

    #[test]
    fn capture_status_is_exact_match() {
        let facts = CallbackFacts {
            capture_status: Some("captured".to_string()),
            ..Default::default()
        };
        assert!(!facts.is_captured());
    }

    #[test]
    fn blank_order_id_is_treated_as_missing() {
        let payload = CallbackPayload::from_value(json!({ "order": { "id": "  " } }));
        assert!(payload.facts().order_id.is_none());
    }

    #[test]
    fn decline_reason_includes_status_and_code() {
        let facts = CallbackFacts {
            payment_status: Some("UNPAID".to_string()),
            txn_response_code: Some("DECLINED".to_string()),
            ..Default::default()
        };
        assert_eq!(
            facts.decline_reason(),
            "Payment Status: UNPAID, Response Code: DECLINED"
        );
    }
}
