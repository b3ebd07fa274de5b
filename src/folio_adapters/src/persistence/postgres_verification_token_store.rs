use std::sync::Arc;

use chrono::{DateTime, Utc};
use folio_core::{
    Clock, TokenPurpose, UserId, VerificationTokenRecord, VerificationTokenStore,
    VerificationTokenStoreError,
};
use sqlx::{FromRow, PgPool, Pool, Postgres};

use crate::auth::token_digest;
use crate::persistence::{VerificationTtls, generate_raw_token};

pub struct PostgresVerificationTokenStore {
    pool: PgPool,
    ttls: VerificationTtls,
    clock: Arc<dyn Clock>,
}

impl PostgresVerificationTokenStore {
    pub fn new(pool: Pool<Postgres>, ttls: VerificationTtls, clock: Arc<dyn Clock>) -> Self {
        PostgresVerificationTokenStore { pool, ttls, clock }
    }
}

#[derive(Debug, FromRow)]
struct VerificationTokenRow {
    id: i64,
    user_id: i32,
    purpose: String,
    pending_email: Option<String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    used: bool,
    used_at: Option<DateTime<Utc>>,
}

impl VerificationTokenRow {
    fn into_record(self) -> Result<VerificationTokenRecord, VerificationTokenStoreError> {
        let purpose = TokenPurpose::parse(&self.purpose).ok_or_else(|| {
            VerificationTokenStoreError::UnexpectedError(format!(
                "unknown token purpose {}",
                self.purpose
            ))
        })?;

        Ok(VerificationTokenRecord {
            id: self.id,
            user_id: self.user_id,
            purpose,
            pending_email: self.pending_email,
            created_at: self.created_at,
            expires_at: self.expires_at,
            used: self.used,
            used_at: self.used_at,
        })
    }
}

#[async_trait::async_trait]
impl VerificationTokenStore for PostgresVerificationTokenStore {
    #[tracing::instrument(name = "Issuing verification token in PostgreSQL", skip_all, fields(purpose = %purpose))]
    async fn issue(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
        pending_email: Option<String>,
    ) -> Result<String, VerificationTokenStoreError> {
        let raw = generate_raw_token();
        let now = self.clock.now();
        let expires_at = now + self.ttls.for_purpose(purpose);

        sqlx::query(
            r#"
                INSERT INTO verification_tokens
                    (user_id, purpose, token_hash, pending_email, created_at, expires_at, used)
                VALUES ($1, $2, $3, $4, $5, $6, FALSE)
            "#,
        )
        .bind(user_id)
        .bind(purpose.as_str())
        .bind(token_digest(&raw))
        .bind(pending_email)
        .bind(now)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| VerificationTokenStoreError::UnexpectedError(e.to_string()))?;

        Ok(raw)
    }

    #[tracing::instrument(name = "Redeeming verification token in PostgreSQL", skip_all)]
    async fn redeem(
        &self,
        raw_token: &str,
        expected_purpose: TokenPurpose,
    ) -> Result<VerificationTokenRecord, VerificationTokenStoreError> {
        let row = sqlx::query_as::<_, VerificationTokenRow>(
            r#"
                SELECT id, user_id, purpose, pending_email, created_at, expires_at, used, used_at
                FROM verification_tokens
                WHERE token_hash = $1
            "#,
        )
        .bind(token_digest(raw_token))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| VerificationTokenStoreError::UnexpectedError(e.to_string()))?;

        let record = row
            .ok_or(VerificationTokenStoreError::TokenNotFound)?
            .into_record()?;

        if record.purpose != expected_purpose {
            return Err(VerificationTokenStoreError::PurposeMismatch);
        }
        if self.clock.now() > record.expires_at {
            return Err(VerificationTokenStoreError::Expired);
        }
        if record.used {
            return Err(VerificationTokenStoreError::AlreadyUsed);
        }
        Ok(record)
    }

    #[tracing::instrument(name = "Marking verification token used in PostgreSQL", skip_all)]
    async fn mark_used(&self, token_id: i64) -> Result<(), VerificationTokenStoreError> {
        let result = sqlx::query(
            r#"
                UPDATE verification_tokens
                SET used = TRUE, used_at = $1
                WHERE id = $2 AND used = FALSE
            "#,
        )
        .bind(self.clock.now())
        .bind(token_id)
        .execute(&self.pool)
        .await
        .map_err(|e| VerificationTokenStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(VerificationTokenStoreError::AlreadyUsed);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Invalidating verification tokens in PostgreSQL", skip_all, fields(purpose = %purpose))]
    async fn invalidate_all_for_purpose(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
    ) -> Result<u64, VerificationTokenStoreError> {
        let result = sqlx::query(
            r#"
                UPDATE verification_tokens
                SET used = TRUE, used_at = $1
                WHERE user_id = $2 AND purpose = $3 AND used = FALSE
            "#,
        )
        .bind(self.clock.now())
        .bind(user_id)
        .bind(purpose.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| VerificationTokenStoreError::UnexpectedError(e.to_string()))?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(name = "Sweeping expired verification tokens in PostgreSQL", skip_all)]
    async fn sweep_expired(&self) -> Result<u64, VerificationTokenStoreError> {
        let result = sqlx::query("DELETE FROM verification_tokens WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| VerificationTokenStoreError::UnexpectedError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
