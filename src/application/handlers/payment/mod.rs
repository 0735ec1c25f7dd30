//! Payment handlers.
//!
//! ## Commands
//! - Creating a gateway order for a merchant reference
//! - Building the hosted payment iframe URL
//! - Reconciling gateway callbacks against tracked requests
//! - Updating stored gateway credentials (admin)
//!
//! `SuccessNotifier` runs the payment-authorized hook once a request completes.

mod build_payment_url;
mod create_order;
mod handle_callback;
mod notify_success;
mod update_credentials;

#[cfg(test)]
pub(crate) mod testing;

pub use build_payment_url::{
    billing_data, iframe_url, BuildPaymentUrlCommand, BuildPaymentUrlHandler,
    BuildPaymentUrlResult, PaymentUrlSettings,
};
pub use create_order::{CreateOrderCommand, CreateOrderHandler, CreateOrderResult};
pub use handle_callback::{HandleCallbackCommand, HandleCallbackHandler, ReconcileOutcome};
pub use notify_success::SuccessNotifier;
pub use update_credentials::{
    UpdateCredentialsCommand, UpdateCredentialsHandler, UpdateCredentialsResult,
    CREDENTIALS_UPDATED,
};
