//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod payment;

pub use payment::{
    BuildPaymentUrlCommand, BuildPaymentUrlHandler, BuildPaymentUrlResult, CreateOrderCommand,
    CreateOrderHandler, CreateOrderResult, HandleCallbackCommand, HandleCallbackHandler,
    PaymentUrlSettings, ReconcileOutcome, SuccessNotifier, UpdateCredentialsCommand,
    UpdateCredentialsHandler, UpdateCredentialsResult,
};
