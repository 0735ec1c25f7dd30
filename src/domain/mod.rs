//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, state machine)
//! - `payment` - Tracked requests, callback verification and reconciliation rules

pub mod foundation;
pub mod payment;
