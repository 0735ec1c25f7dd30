//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `GatewayClient` - Paymob Accept HTTP API
//! - `IntegrationRequestRepository` - Tracked request persistence with versioned updates
//! - `CredentialStore` - Singleton credential record and token cache
//! - `PaymentAuthorizedHook` - Downstream notification of completed payments

mod credential_store;
mod gateway_client;
mod integration_request_repository;
mod payment_authorized_hook;

pub use credential_store::CredentialStore;
pub use gateway_client::{
    AuthToken, BillingData, CreateOrderRequest, GatewayClient, GatewayError, GatewayErrorKind,
    GatewayOrder, OrderItem, PaymentKey, PaymentKeyRequest,
};
pub use integration_request_repository::{IntegrationRequestRepository, UpdateResult};
pub use payment_authorized_hook::{HookError, PaymentAuthorizedHook};
