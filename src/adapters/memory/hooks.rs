//! Payment-authorized hook implementations.
//!
//! `HookRegistry` routes each completed payment to the hook registered for
//! its merchant reference type. Types without a hook are acknowledged
//! without a redirect override.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::domain::payment::{MerchantReference, RequestStatus};
use crate::ports::{HookError, PaymentAuthorizedHook};

/// Hook that accepts every notification and never overrides the redirect.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

#[async_trait]
impl PaymentAuthorizedHook for NoopHook {
    async fn on_payment_authorized(
        &self,
        reference: &MerchantReference,
        status: RequestStatus,
    ) -> Result<Option<String>, HookError> {
        debug!(
            reference_type = %reference.reference_type,
            reference_id = %reference.reference_id,
            status = status.as_str(),
            "No payment hook registered"
        );
        Ok(None)
    }
}

/// Dispatches to hooks by merchant reference type.
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: HashMap<String, Arc<dyn PaymentAuthorizedHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `hook` for `reference_type`, replacing any previous one.
    pub fn register(
        mut self,
        reference_type: impl Into<String>,
        hook: Arc<dyn PaymentAuthorizedHook>,
    ) -> Self {
        self.hooks.insert(reference_type.into(), hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

#[async_trait]
impl PaymentAuthorizedHook for HookRegistry {
    async fn on_payment_authorized(
        &self,
        reference: &MerchantReference,
        status: RequestStatus,
    ) -> Result<Option<String>, HookError> {
        match self.hooks.get(&reference.reference_type) {
            Some(hook) => hook.on_payment_authorized(reference, status).await,
            None => NoopHook.on_payment_authorized(reference, status).await,
        }
    }
}
