//! Payment domain - Paymob checkout tracking and callback verification.
//!
//! # Module Organization
//!
//! - `tracked_request` - The local record of one checkout attempt
//! - `request_status` - Its Pending / Completed / Failed lifecycle
//! - `callback` - Untrusted callback payloads and the facts derived from them
//! - `hmac_validator` - HMAC-SHA512 callback signature verification
//! - `credentials` - Merchant credentials and the cached auth token
//! - `redirect` - Post-payment redirect target
//! - `errors` / `gateway_error` - Error taxonomy

mod callback;
mod credentials;
mod errors;
mod gateway_error;
mod hmac_validator;
mod redirect;
mod request_status;
mod tracked_request;

pub use callback::{CallbackFacts, CallbackPayload, CAPTURED};
pub use credentials::{CachedToken, CredentialsUpdate, PaymobCredentials, PaymobSettings};
pub use errors::PaymentError;
pub use gateway_error::{GatewayError, GatewayErrorKind};
pub use hmac_validator::{HmacValidator, SIGNED_FIELDS};
pub use redirect::{SuccessRedirect, PAYMENT_SUCCESS_PATH};
pub use request_status::RequestStatus;
pub use tracked_request::{
    MerchantReference, TrackedRequest, DATA_KEY_GATEWAY_ORDER_ID, DATA_KEY_ORDER_ID,
    DATA_KEY_PAYMENT_ID,
};

#[cfg(test)]
pub(crate) use credentials::test_support;
