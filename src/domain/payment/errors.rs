//! Payment-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | ValidationFailed | 400 |
//! | SignatureInvalid | 401 |
//! | NotFound | 404 |
//! | CredentialsMissing | 503 |
//! | InvalidState | 409 |
//! | ConcurrentModification | 409 |
//! | Gateway | 502 |
//! | Hook | 500 |
//! | Infrastructure | 500 |
//!
//! Callbacks never surface these statuses: the webhook answers 200 for all
//! of them.

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

use super::GatewayError;

/// Payment-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// Input rejected before any state was touched.
    ValidationFailed { field: String, message: String },

    /// Callback HMAC did not match.
    SignatureInvalid,

    /// No tracked request matches the gateway order id.
    NotFound(String),

    /// Credentials have not been configured yet.
    CredentialsMissing,

    /// The gateway call failed.
    Gateway(GatewayError),

    /// The downstream payment-authorized hook failed.
    Hook(String),

    /// Requested transition is not allowed from the current status.
    InvalidState { current: String, attempted: String },

    /// Record kept changing underneath us after every retry.
    ConcurrentModification(String),

    /// Infrastructure error.
    Infrastructure(String),
}

impl PaymentError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn signature_invalid() -> Self {
        PaymentError::SignatureInvalid
    }

    pub fn not_found(order_id: impl Into<String>) -> Self {
        PaymentError::NotFound(order_id.into())
    }

    pub fn hook(message: impl Into<String>) -> Self {
        PaymentError::Hook(message.into())
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        PaymentError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn concurrent_modification(order_id: impl Into<String>) -> Self {
        PaymentError::ConcurrentModification(order_id.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PaymentError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PaymentError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            PaymentError::SignatureInvalid => ErrorCode::InvalidSignature,
            PaymentError::NotFound(_) => ErrorCode::IntegrationRequestNotFound,
            PaymentError::CredentialsMissing => ErrorCode::CredentialsNotConfigured,
            PaymentError::Gateway(_) => ErrorCode::GatewayError,
            PaymentError::Hook(_) => ErrorCode::HookFailed,
            PaymentError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            PaymentError::ConcurrentModification(_) => ErrorCode::ConcurrentModification,
            PaymentError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            PaymentError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            PaymentError::SignatureInvalid => "Invalid callback signature".to_string(),
            PaymentError::NotFound(order_id) => {
                format!("No integration request found for order {}", order_id)
            }
            PaymentError::CredentialsMissing => {
                "Paymob credentials are not configured".to_string()
            }
            PaymentError::Gateway(err) => format!("Gateway error: {}", err),
            PaymentError::Hook(msg) => format!("Payment authorized hook failed: {}", msg),
            PaymentError::InvalidState { current, attempted } => {
                format!("Cannot move request from {} to {}", current, attempted)
            }
            PaymentError::ConcurrentModification(order_id) => {
                format!("Integration request for order {} kept changing", order_id)
            }
            PaymentError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PaymentError {}

impl From<GatewayError> for PaymentError {
    fn from(err: GatewayError) -> Self {
        PaymentError::Gateway(err)
    }
}

impl From<ValidationError> for PaymentError {
    fn from(err: ValidationError) -> Self {
        PaymentError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for PaymentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => PaymentError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::CredentialsNotConfigured => PaymentError::CredentialsMissing,
            ErrorCode::InvalidStateTransition => PaymentError::InvalidState {
                current: "unknown".to_string(),
                attempted: err.message,
            },
            _ => PaymentError::Infrastructure(err.to_string()),
        }
    }
}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
