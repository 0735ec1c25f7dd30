//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;
mod token_store;

pub use handlers::{
    BuildPaymentUrlCommand, BuildPaymentUrlHandler, BuildPaymentUrlResult, CreateOrderCommand,
    CreateOrderHandler, CreateOrderResult, HandleCallbackCommand, HandleCallbackHandler,
    PaymentUrlSettings, ReconcileOutcome, SuccessNotifier, UpdateCredentialsCommand,
    UpdateCredentialsHandler, UpdateCredentialsResult,
};
pub use token_store::{TokenPolicy, TokenStore};
