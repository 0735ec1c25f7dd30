//! In-Memory Integration Request Repository
//!
//! Keeps tracked requests in insertion order behind a `tokio` lock.
//! Useful for testing and development.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, GatewayOrderId, TrackedRequestId};
use crate::domain::payment::TrackedRequest;
use crate::ports::{IntegrationRequestRepository, UpdateResult};

#[derive(Debug, Clone, Default)]
pub struct InMemoryIntegrationRequestRepository {
    requests: Arc<RwLock<Vec<TrackedRequest>>>,
}

impl InMemoryIntegrationRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored request, oldest first.
    pub async fn all(&self) -> Vec<TrackedRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl IntegrationRequestRepository for InMemoryIntegrationRequestRepository {
    async fn save(&self, request: &TrackedRequest) -> Result<(), DomainError> {
        let mut requests = self.requests.write().await;
        if requests.iter().any(|r| r.id == request.id) {
            return Err(DomainError::database(format!(
                "Integration request {} already exists",
                request.id
            )));
        }
        requests.push(request.clone());
        Ok(())
    }

    async fn update(&self, request: &TrackedRequest) -> Result<UpdateResult, DomainError> {
        let mut requests = self.requests.write().await;
        let stored = requests
            .iter_mut()
            .find(|r| r.id == request.id)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::IntegrationRequestNotFound,
                    format!("Integration request not found: {}", request.id),
                )
                .with_detail("tracked_request_id", request.id.to_string())
            })?;

        if stored.version != request.version {
            return Ok(UpdateResult::Conflict);
        }

        *stored = request.clone();
        stored.version = request.version + 1;
        Ok(UpdateResult::Updated)
    }

    async fn find_by_id(
        &self,
        id: &TrackedRequestId,
    ) -> Result<Option<TrackedRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests.iter().find(|r| &r.id == id).cloned())
    }

    async fn find_latest_by_gateway_order_id(
        &self,
        order_id: &GatewayOrderId,
    ) -> Result<Option<TrackedRequest>, DomainError> {
        let requests = self.requests.read().await;
        // max_by_key keeps the last maximum, so later inserts win ties
        Ok(requests
            .iter()
            .filter(|r| r.gateway_order_id.as_ref() == Some(order_id))
            .max_by_key(|r| r.created_at)
            .cloned())
    }
}
