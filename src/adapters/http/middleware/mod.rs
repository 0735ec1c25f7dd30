//! HTTP middleware for axum.
//!
//! - `admin_key` - Shared-key guard for administrative routes

pub mod admin_key;

pub use admin_key::{require_admin_key, AdminKeyState, ADMIN_KEY_HEADER};
