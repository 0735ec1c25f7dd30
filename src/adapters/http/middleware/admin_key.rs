//! Admin key middleware for axum.
//!
//! Guards administrative routes with a shared key sent in the
//! `X-Admin-Key` header:
//!
//! ```text
//! X-Admin-Key: <key>
//! ```
//!
//! When no key is configured every request is rejected.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use crate::adapters::http::payment::dto::ErrorResponse;

/// Header carrying the admin key.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Middleware state: the configured admin key, if any.
pub type AdminKeyState = Arc<Option<SecretString>>;

/// Rejects requests whose `X-Admin-Key` does not match the configured key.
pub async fn require_admin_key(
    State(expected): State<AdminKeyState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = expected.as_ref() else {
        tracing::warn!("Admin request rejected: no admin key configured");
        return rejection(StatusCode::FORBIDDEN, "Admin endpoints are disabled");
    };

    let provided = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    let matches: bool = provided
        .as_bytes()
        .ct_eq(expected.expose_secret().as_bytes())
        .into();

    if !matches {
        tracing::warn!(path = %request.uri().path(), "Admin request rejected: bad key");
        return rejection(StatusCode::UNAUTHORIZED, "Invalid admin key");
    }

    next.run(request).await
}

fn rejection(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new("UNAUTHORIZED", message))).into_response()
}
