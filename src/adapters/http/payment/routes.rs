//! Axum router configuration for the Paymob endpoints.

use std::time::Duration;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::timeout::TimeoutLayer;

use super::handlers::{
    create_order, health, payment_url, paymob_callback, refresh_token, update_settings,
    PaymentAppState,
};
use crate::adapters::http::middleware::{require_admin_key, AdminKeyState};

/// Gateway callback route.
///
/// Kept outside the request timeout: a callback must run to completion once
/// it has started writing.
///
/// # Routes
/// - `POST /callback` - Gateway transaction callback (signature verified)
pub fn callback_routes() -> Router<PaymentAppState> {
    Router::new().route("/callback", post(paymob_callback))
}

/// Checkout routes.
///
/// # Routes
/// - `POST /orders` - Register a gateway order
/// - `POST /payment-url` - Build the hosted iframe URL
pub fn checkout_routes() -> Router<PaymentAppState> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/payment-url", post(payment_url))
}

/// Admin routes, guarded by `X-Admin-Key`.
///
/// # Routes
/// - `PUT /settings` - Replace stored credentials
/// - `POST /token/refresh` - Force a new auth token
pub fn admin_routes(admin_key: AdminKeyState) -> Router<PaymentAppState> {
    Router::new()
        .route("/settings", put(update_settings))
        .route("/token/refresh", post(refresh_token))
        .layer(from_fn_with_state(admin_key, require_admin_key))
}

/// The complete router, mounted at `/api/paymob` with `/health` alongside.
///
/// `request_timeout` bounds the checkout and admin routes only.
pub fn payment_router(
    admin_key: AdminKeyState,
    request_timeout: Duration,
) -> Router<PaymentAppState> {
    let bounded = checkout_routes()
        .merge(admin_routes(admin_key))
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .route("/health", get(health))
        .nest("/api/paymob", callback_routes().merge(bounded))
}
