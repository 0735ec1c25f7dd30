//! SuccessNotifier - tells the merchant object its payment completed.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::domain::payment::{PaymentError, RequestStatus, SuccessRedirect, TrackedRequest};
use crate::ports::PaymentAuthorizedHook;

/// Upper bound on a single payment-authorized hook call.
pub const DEFAULT_HOOK_TIMEOUT: Duration = Duration::from_secs(30);

pub struct SuccessNotifier {
    hook: Arc<dyn PaymentAuthorizedHook>,
    timeout: Duration,
}

impl SuccessNotifier {
    pub fn new(hook: Arc<dyn PaymentAuthorizedHook>) -> Self {
        Self {
            hook,
            timeout: DEFAULT_HOOK_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs the payment-authorized hook and builds the payer's redirect.
    ///
    /// A hook that fails or overruns the timeout is logged and the request's
    /// own redirect target is used.
    pub async fn notify(&self, request: &TrackedRequest) -> SuccessRedirect {
        let mut redirect_to = request.redirect_to.clone();

        match self.run_hook(request).await {
            Ok(Some(custom)) if !custom.is_empty() => redirect_to = Some(custom),
            Ok(_) => {}
            Err(e) => {
                error!(
                    tracked_request_id = %request.id,
                    reference_type = %request.reference.reference_type,
                    reference_id = %request.reference.reference_id,
                    code = %e.code(),
                    error = %e,
                    "Payment authorized hook failed"
                );
            }
        }

        let redirect = SuccessRedirect::for_reference(&request.reference, redirect_to.as_deref());
        info!(
            tracked_request_id = %request.id,
            redirect_to = %redirect.redirect_to,
            "Payment success notified"
        );
        redirect
    }

    async fn run_hook(&self, request: &TrackedRequest) -> Result<Option<String>, PaymentError> {
        let call = self
            .hook
            .on_payment_authorized(&request.reference, RequestStatus::Completed);

        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(|e| PaymentError::hook(e.to_string())),
            Err(_) => Err(PaymentError::hook(format!(
                "no answer within {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::payment::testing::RecordingHook;
    use crate::domain::payment::MerchantReference;
    use crate::ports::HookError;
    use serde_json::Map;

    fn completed_request(redirect_to: Option<&str>) -> TrackedRequest {
        let mut request = TrackedRequest::new(
            MerchantReference::new("Sales Invoice", "SINV-0001").unwrap(),
            redirect_to.map(str::to_string),
            Map::new(),
        );
        request.complete().unwrap();
        request
    }

    #[tokio::test]
    async fn calls_hook_with_reference_and_completed() {
        let hook = Arc::new(RecordingHook::new());
        let notifier = SuccessNotifier::new(hook.clone());

        notifier.notify(&completed_request(None)).await;

        let calls = hook.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.reference_id, "SINV-0001");
        assert_eq!(calls[0].1, RequestStatus::Completed);
    }

    #[tokio::test]
    async fn uses_request_redirect_when_hook_returns_none() {
        let notifier = SuccessNotifier::new(Arc::new(RecordingHook::new()));

        let redirect = notifier.notify(&completed_request(Some("/orders"))).await;

        assert_eq!(
            redirect.redirect_to,
            "payment-success?doctype=Sales+Invoice&docname=SINV-0001&redirect_to=%2Forders"
        );
        assert_eq!(redirect.status, RequestStatus::Completed);
    }

    #[tokio::test]
    async fn hook_redirect_overrides_request_redirect() {
        let hook = RecordingHook::returning(Ok(Some("/thank-you".to_string())));
        let notifier = SuccessNotifier::new(Arc::new(hook));

        let redirect = notifier.notify(&completed_request(Some("/orders"))).await;

        assert!(redirect.redirect_to.ends_with("redirect_to=%2Fthank-you"));
    }

    #[tokio::test]
    async fn hook_error_falls_back_to_default_redirect() {
        let hook = RecordingHook::returning(Err(HookError::new("invoice is cancelled")));
        let notifier = SuccessNotifier::new(Arc::new(hook));

        let redirect = notifier.notify(&completed_request(Some("/orders"))).await;

        assert!(redirect.redirect_to.ends_with("redirect_to=%2Forders"));
        assert_eq!(redirect.status, RequestStatus::Completed);
    }

    #[tokio::test]
    async fn no_redirect_target_at_all() {
        let notifier = SuccessNotifier::new(Arc::new(RecordingHook::new()));

        let redirect = notifier.notify(&completed_request(None)).await;

        assert_eq!(
            redirect.redirect_to,
            "payment-success?doctype=Sales+Invoice&docname=SINV-0001"
        );
    }

    #[tokio::test]
    async fn slow_hook_is_abandoned_after_timeout() {
        let hook = RecordingHook::new().with_delay(Duration::from_millis(500));
        let notifier =
            SuccessNotifier::new(Arc::new(hook)).with_timeout(Duration::from_millis(20));

        let redirect = tokio::time::timeout(
            Duration::from_millis(250),
            notifier.notify(&completed_request(Some("/orders"))),
        )
        .await
        .expect("notify must not wait for a slow hook");

        assert!(redirect.redirect_to.ends_with("redirect_to=%2Forders"));
        assert_eq!(redirect.status, RequestStatus::Completed);
    }
}
