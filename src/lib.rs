//! Paymob Gateway - Paymob Accept integration service.
//!
//! Registers gateway orders for merchant documents, hands out hosted
//! payment URLs, and reconciles signed transaction callbacks against the
//! tracked requests that started them.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
