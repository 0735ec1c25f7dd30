//! PostgreSQL implementation of CredentialStore.
//!
//! The settings live in a single row (`id = 1`) of `paymob_settings`.

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::payment::{CachedToken, PaymobCredentials, PaymobSettings};
use crate::ports::CredentialStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SettingsRow {
    api_key: String,
    secret_key: String,
    public_key: String,
    hmac_secret: String,
    iframe_id: String,
    integration_id: i64,
    token: Option<String>,
    token_expires_at: Option<DateTime<Utc>>,
}

impl From<SettingsRow> for PaymobSettings {
    fn from(row: SettingsRow) -> Self {
        let token = match (row.token, row.token_expires_at) {
            (Some(token), Some(expires_at)) => Some(CachedToken::new(
                SecretString::new(token),
                Timestamp::from_datetime(expires_at),
            )),
            _ => None,
        };

        PaymobSettings {
            credentials: PaymobCredentials {
                api_key: SecretString::new(row.api_key),
                secret_key: SecretString::new(row.secret_key),
                public_key: SecretString::new(row.public_key),
                hmac_secret: SecretString::new(row.hmac_secret),
                iframe_id: row.iframe_id,
                integration_id: row.integration_id,
            },
            token,
        }
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn load(&self) -> Result<Option<PaymobSettings>, DomainError> {
        let row: Option<SettingsRow> = sqlx::query_as(
            r#"
            SELECT api_key, secret_key, public_key, hmac_secret, iframe_id, integration_id,
                   token, token_expires_at
            FROM paymob_settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to load Paymob settings: {}", e))
        })?;

        Ok(row.map(PaymobSettings::from))
    }

    async fn save(&self, settings: &PaymobSettings) -> Result<(), DomainError> {
        let creds = &settings.credentials;
        let (token, expires_at) = match &settings.token {
            Some(t) => (
                Some(t.token.expose_secret().to_string()),
                Some(*t.expires_at.as_datetime()),
            ),
            None => (None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO paymob_settings (
                id, api_key, secret_key, public_key, hmac_secret, iframe_id, integration_id,
                token, token_expires_at, updated_at
            ) VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, now())
            ON CONFLICT (id) DO UPDATE SET
                api_key = EXCLUDED.api_key,
                secret_key = EXCLUDED.secret_key,
                public_key = EXCLUDED.public_key,
                hmac_secret = EXCLUDED.hmac_secret,
                iframe_id = EXCLUDED.iframe_id,
                integration_id = EXCLUDED.integration_id,
                token = EXCLUDED.token,
                token_expires_at = EXCLUDED.token_expires_at,
                updated_at = now()
            "#,
        )
        .bind(creds.api_key.expose_secret())
        .bind(creds.secret_key.expose_secret())
        .bind(creds.public_key.expose_secret())
        .bind(creds.hmac_secret.expose_secret())
        .bind(&creds.iframe_id)
        .bind(creds.integration_id)
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save Paymob settings: {}", e))
        })?;

        Ok(())
    }

    async fn save_token(&self, token: &CachedToken) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE paymob_settings SET
                token = $1,
                token_expires_at = $2,
                updated_at = now()
            WHERE id = 1
            "#,
        )
        .bind(token.token.expose_secret())
        .bind(token.expires_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save Paymob token: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CredentialsNotConfigured,
                "Cannot store a token before credentials are configured",
            ));
        }

        Ok(())
    }
}
