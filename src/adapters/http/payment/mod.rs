//! HTTP adapter for the Paymob endpoints.
//!
//! - `POST /api/paymob/callback` - Gateway callback, always answered with 200
//! - `POST /api/paymob/orders` - Create a gateway order
//! - `POST /api/paymob/payment-url` - Build the hosted payment URL
//! - `PUT /api/paymob/settings` - Update credentials (admin)
//! - `POST /api/paymob/token/refresh` - Force a token refresh (admin)
//! - `GET /health`

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{PaymentApiError, PaymentAppState};
pub use routes::{admin_routes, checkout_routes, payment_router};
