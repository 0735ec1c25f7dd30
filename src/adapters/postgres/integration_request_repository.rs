//! PostgreSQL implementation of IntegrationRequestRepository.
//!
//! Updates are guarded by the `version` column; see the port for the
//! compare-and-swap contract.

use crate::domain::foundation::{
    DomainError, ErrorCode, GatewayOrderId, Timestamp, TrackedRequestId,
};
use crate::domain::payment::{MerchantReference, RequestStatus, TrackedRequest};
use crate::ports::{IntegrationRequestRepository, UpdateResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the IntegrationRequestRepository port.
pub struct PostgresIntegrationRequestRepository {
    pool: PgPool,
}

impl PostgresIntegrationRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: &TrackedRequestId) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM integration_requests WHERE id = $1)")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to check integration request: {}", e),
                )
            })
    }
}

/// Database row representation of a tracked request.
#[derive(Debug, sqlx::FromRow)]
struct IntegrationRequestRow {
    id: Uuid,
    reference_type: String,
    reference_id: String,
    redirect_to: Option<String>,
    gateway_order_id: Option<String>,
    status: String,
    data: Json<Map<String, Value>>,
    error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i32,
}

impl TryFrom<IntegrationRequestRow> for TrackedRequest {
    type Error = DomainError;

    fn try_from(row: IntegrationRequestRow) -> Result<Self, Self::Error> {
        let reference = MerchantReference::new(row.reference_type, row.reference_id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid reference: {}", e))
        })?;
        let gateway_order_id = row
            .gateway_order_id
            .map(GatewayOrderId::new)
            .transpose()
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid gateway_order_id: {}", e))
            })?;

        Ok(TrackedRequest {
            id: TrackedRequestId::from_uuid(row.id),
            reference,
            redirect_to: row.redirect_to,
            gateway_order_id,
            status: RequestStatus::parse(&row.status)?,
            data: row.data.0,
            error: row.error,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
            version: row.version,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, reference_type, reference_id, redirect_to, gateway_order_id, status,
           data, error, created_at, updated_at, version
    FROM integration_requests
"#;

#[async_trait]
impl IntegrationRequestRepository for PostgresIntegrationRequestRepository {
    async fn save(&self, request: &TrackedRequest) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO integration_requests (
                id, reference_type, reference_id, redirect_to, gateway_order_id, status,
                data, error, created_at, updated_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(&request.reference.reference_type)
        .bind(&request.reference.reference_id)
        .bind(&request.redirect_to)
        .bind(request.gateway_order_id.as_ref().map(GatewayOrderId::as_str))
        .bind(request.status.as_str())
        .bind(Json(&request.data))
        .bind(&request.error)
        .bind(request.created_at.as_datetime())
        .bind(request.updated_at.as_datetime())
        .bind(request.version)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save integration request: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, request: &TrackedRequest) -> Result<UpdateResult, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE integration_requests SET
                redirect_to = $2,
                gateway_order_id = $3,
                status = $4,
                data = $5,
                error = $6,
                updated_at = $7,
                version = version + 1
            WHERE id = $1 AND version = $8
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(&request.redirect_to)
        .bind(request.gateway_order_id.as_ref().map(GatewayOrderId::as_str))
        .bind(request.status.as_str())
        .bind(Json(&request.data))
        .bind(&request.error)
        .bind(request.updated_at.as_datetime())
        .bind(request.version)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update integration request: {}", e),
            )
        })?;

        if result.rows_affected() == 1 {
            return Ok(UpdateResult::Updated);
        }

        if self.exists(&request.id).await? {
            Ok(UpdateResult::Conflict)
        } else {
            Err(DomainError::new(
                ErrorCode::IntegrationRequestNotFound,
                format!("Integration request not found: {}", request.id),
            )
            .with_detail("tracked_request_id", request.id.to_string()))
        }
    }

    async fn find_by_id(
        &self,
        id: &TrackedRequestId,
    ) -> Result<Option<TrackedRequest>, DomainError> {
        let row: Option<IntegrationRequestRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find integration request: {}", e),
                    )
                })?;

        row.map(TrackedRequest::try_from).transpose()
    }

    async fn find_latest_by_gateway_order_id(
        &self,
        order_id: &GatewayOrderId,
    ) -> Result<Option<TrackedRequest>, DomainError> {
        let row: Option<IntegrationRequestRow> = sqlx::query_as(&format!(
            "{} WHERE gateway_order_id = $1 ORDER BY created_at DESC LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(order_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find integration request: {}", e),
            )
        })?;

        row.map(TrackedRequest::try_from).transpose()
    }
}
