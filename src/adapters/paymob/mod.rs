//! Paymob Accept adapter.
//!
//! Implements the `GatewayClient` port for Paymob, including:
//! - Bearer token retrieval
//! - Order registration
//! - Payment key generation for the hosted iframe
//!
//! # Configuration
//!
//! The API root defaults to `https://accept.paymob.com/api` and is
//! overridable through `paymob.api_base_url`.

mod api_types;
mod client;
mod urls;

pub use client::{PaymobClient, PaymobClientConfig, DEFAULT_TIMEOUT};
pub use urls::{Endpoint, PaymobUrls, DEFAULT_API_BASE_URL};
