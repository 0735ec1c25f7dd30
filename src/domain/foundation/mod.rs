//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that the payment
//! domain is written in.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{GatewayOrderId, TrackedRequestId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
