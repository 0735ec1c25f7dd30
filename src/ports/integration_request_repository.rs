//! Integration request repository port.
//!
//! Persists [`TrackedRequest`] records. Records are never deleted.
//!
//! # Concurrency
//!
//! `update` is a compare-and-swap on `version`: it only writes when the
//! stored version still equals the version the caller read, and bumps it on
//! success. Callers that lose the race re-read and re-apply. This is the
//! per-record serialization point for callback reconciliation.
//!
//! ```ignore
//! loop {
//!     let mut request = repo.find_latest_by_gateway_order_id(&order_id).await?
//!         .ok_or_else(|| PaymentError::not_found(order_id.as_str()))?;
//!     request.complete()?;
//!     if let UpdateResult::Updated = repo.update(&request).await? {
//!         break;
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, GatewayOrderId, TrackedRequestId};
use crate::domain::payment::TrackedRequest;

/// Outcome of a versioned update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResult {
    /// Written; the stored version is now `request.version + 1`.
    Updated,
    /// The stored version differs from the caller's. Nothing was written.
    Conflict,
}

/// Repository port for tracked integration requests.
#[async_trait]
pub trait IntegrationRequestRepository: Send + Sync {
    /// Insert a new request.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure or duplicate id
    async fn save(&self, request: &TrackedRequest) -> Result<(), DomainError>;

    /// Write `request` if the stored version equals `request.version`.
    ///
    /// # Errors
    ///
    /// - `IntegrationRequestNotFound` if the id does not exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, request: &TrackedRequest) -> Result<UpdateResult, DomainError>;

    /// Find a request by its id.
    async fn find_by_id(&self, id: &TrackedRequestId)
        -> Result<Option<TrackedRequest>, DomainError>;

    /// Find the most recently created request for a gateway order id.
    async fn find_latest_by_gateway_order_id(
        &self,
        order_id: &GatewayOrderId,
    ) -> Result<Option<TrackedRequest>, DomainError>;
}
