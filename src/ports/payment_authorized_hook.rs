//! Payment-authorized hook port.
//!
//! The merchant object that started a checkout (an invoice, an order, a
//! subscription) is told when its payment completes. The hook may answer
//! with its own redirect target for the payer.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::payment::{MerchantReference, RequestStatus};

/// Error raised by a merchant hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HookError(pub String);

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[async_trait]
pub trait PaymentAuthorizedHook: Send + Sync {
    /// Called once per completed tracked request.
    ///
    /// Returns an optional redirect target overriding the request's own.
    async fn on_payment_authorized(
        &self,
        reference: &MerchantReference,
        status: RequestStatus,
    ) -> Result<Option<String>, HookError>;
}
