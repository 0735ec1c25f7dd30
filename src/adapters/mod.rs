//! Adapters - Implementations of port interfaces.
//!
//! - `paymob` - Paymob Accept HTTP client
//! - `postgres` - PostgreSQL repositories
//! - `memory` - In-memory stores and hooks for tests and local runs
//! - `http` - Axum routes

pub mod http;
pub mod memory;
pub mod paymob;
pub mod postgres;

pub use memory::{
    HookRegistry, InMemoryCredentialStore, InMemoryIntegrationRequestRepository, NoopHook,
};
pub use paymob::{PaymobClient, PaymobClientConfig};
pub use postgres::{PostgresCredentialStore, PostgresIntegrationRequestRepository};
