//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresIntegrationRequestRepository` - Tracked requests with versioned updates
//! - `PostgresCredentialStore` - Singleton Paymob settings row

mod credential_store;
mod integration_request_repository;

pub use credential_store::PostgresCredentialStore;
pub use integration_request_repository::PostgresIntegrationRequestRepository;
