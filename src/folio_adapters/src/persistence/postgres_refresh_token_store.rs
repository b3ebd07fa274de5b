use chrono::{DateTime, Utc};
use folio_core::{RefreshTokenRecord, RefreshTokenStore, RefreshTokenStoreError, UserId};
use sqlx::{FromRow, PgPool, Pool, Postgres};

use crate::auth::token_digest;

pub struct PostgresRefreshTokenStore {
    pool: PgPool,
}

impl PostgresRefreshTokenStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresRefreshTokenStore { pool }
    }
}

#[derive(Debug, FromRow)]
struct RefreshTokenRow {
    user_id: i32,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    revoked: bool,
    replaced_by: Option<String>,
}

impl From<RefreshTokenRow> for RefreshTokenRecord {
    fn from(row: RefreshTokenRow) -> Self {
        RefreshTokenRecord {
            user_id: row.user_id,
            issued_at: row.issued_at,
            expires_at: row.expires_at,
            revoked: row.revoked,
            replaced_by: row.replaced_by,
        }
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for PostgresRefreshTokenStore {
    #[tracing::instrument(name = "Saving refresh token to PostgreSQL", skip_all)]
    async fn save(
        &self,
        user_id: UserId,
        raw_token: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RefreshTokenStoreError> {
        sqlx::query(
            r#"
                INSERT INTO refresh_tokens (user_id, token_hash, issued_at, expires_at, revoked)
                VALUES ($1, $2, $3, $4, FALSE)
            "#,
        )
        .bind(user_id)
        .bind(token_digest(raw_token))
        .bind(issued_at)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RefreshTokenStoreError::UnexpectedError(e.to_string()))?;

        Ok(())
    }

    #[tracing::instrument(name = "Looking up refresh token in PostgreSQL", skip_all)]
    async fn find(&self, raw_token: &str) -> Result<RefreshTokenRecord, RefreshTokenStoreError> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
                SELECT user_id, issued_at, expires_at, revoked, replaced_by
                FROM refresh_tokens
                WHERE token_hash = $1
            "#,
        )
        .bind(token_digest(raw_token))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RefreshTokenStoreError::UnexpectedError(e.to_string()))?;

        row.map(Into::into)
            .ok_or(RefreshTokenStoreError::TokenNotFound)
    }

    #[tracing::instrument(name = "Revoking refresh token in PostgreSQL", skip_all)]
    async fn revoke(&self, raw_token: &str) -> Result<(), RefreshTokenStoreError> {
        let result = sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE token_hash = $1")
            .bind(token_digest(raw_token))
            .execute(&self.pool)
            .await
            .map_err(|e| RefreshTokenStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RefreshTokenStoreError::TokenNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Rotating refresh token in PostgreSQL", skip_all)]
    async fn rotate(
        &self,
        old_raw_token: &str,
        new_raw_token: &str,
        new_jti: &str,
        user_id: UserId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RefreshTokenStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RefreshTokenStoreError::UnexpectedError(e.to_string()))?;

        // The conditional update is the rotation lock: exactly one caller
        // can flip revoked from FALSE to TRUE.
        let revoked = sqlx::query(
            r#"
                UPDATE refresh_tokens
                SET revoked = TRUE, replaced_by = $1
                WHERE token_hash = $2 AND revoked = FALSE
            "#,
        )
        .bind(new_jti)
        .bind(token_digest(old_raw_token))
        .execute(&mut *tx)
        .await
        .map_err(|e| RefreshTokenStoreError::UnexpectedError(e.to_string()))?;

        if revoked.rows_affected() == 0 {
            let exists = sqlx::query("SELECT 1 FROM refresh_tokens WHERE token_hash = $1")
                .bind(token_digest(old_raw_token))
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| RefreshTokenStoreError::UnexpectedError(e.to_string()))?;

            tx.rollback()
                .await
                .map_err(|e| RefreshTokenStoreError::UnexpectedError(e.to_string()))?;

            return Err(if exists.is_some() {
                RefreshTokenStoreError::AlreadyRotated
            } else {
                RefreshTokenStoreError::TokenNotFound
            });
        }

        sqlx::query(
            r#"
                INSERT INTO refresh_tokens (user_id, token_hash, issued_at, expires_at, revoked)
                VALUES ($1, $2, $3, $4, FALSE)
            "#,
        )
        .bind(user_id)
        .bind(token_digest(new_raw_token))
        .bind(issued_at)
        .bind(expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RefreshTokenStoreError::UnexpectedError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RefreshTokenStoreError::UnexpectedError(e.to_string()))
    }

    #[tracing::instrument(name = "Revoking all refresh tokens for user in PostgreSQL", skip_all)]
    async fn revoke_all_for_user(&self, user_id: UserId) -> Result<u64, RefreshTokenStoreError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE WHERE user_id = $1 AND revoked = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| RefreshTokenStoreError::UnexpectedError(e.to_string()))?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(name = "Sweeping expired refresh tokens in PostgreSQL", skip_all)]
    async fn sweep_expired(&self) -> Result<u64, RefreshTokenStoreError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| RefreshTokenStoreError::UnexpectedError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
