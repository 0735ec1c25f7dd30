//! In-memory adapters for tests and local development.

mod credential_store;
mod hooks;
mod integration_request_repository;

pub use credential_store::InMemoryCredentialStore;
pub use hooks::{HookRegistry, NoopHook};
pub use integration_request_repository::InMemoryIntegrationRequestRepository;
