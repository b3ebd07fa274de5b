use chrono::{DateTime, Utc};
use folio_core::{JwtBlacklistStore, JwtBlacklistStoreError, UserId};
use sqlx::{PgPool, Pool, Postgres, Row};

pub struct PostgresJwtBlacklistStore {
    pool: PgPool,
}

impl PostgresJwtBlacklistStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresJwtBlacklistStore { pool }
    }
}

#[async_trait::async_trait]
impl JwtBlacklistStore for PostgresJwtBlacklistStore {
    #[tracing::instrument(name = "Blacklisting access token in PostgreSQL", skip_all)]
    async fn add(
        &self,
        user_id: UserId,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), JwtBlacklistStoreError> {
        // Re-blacklisting the same jti is a no-op, not an error.
        sqlx::query(
            r#"
                INSERT INTO jwt_blacklist (token_jti, user_id, expires_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (token_jti) DO NOTHING
            "#,
        )
        .bind(jti)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| JwtBlacklistStoreError::UnexpectedError(e.to_string()))?;

        Ok(())
    }

    #[tracing::instrument(name = "Checking access token blacklist in PostgreSQL", skip_all)]
    async fn contains(&self, jti: &str) -> Result<bool, JwtBlacklistStoreError> {
        let row =
            sqlx::query("SELECT EXISTS(SELECT 1 FROM jwt_blacklist WHERE token_jti = $1) AS present")
                .bind(jti)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| JwtBlacklistStoreError::UnexpectedError(e.to_string()))?;

        row.try_get("present")
            .map_err(|e| JwtBlacklistStoreError::UnexpectedError(e.to_string()))
    }

    #[tracing::instrument(name = "Sweeping expired blacklist entries in PostgreSQL", skip_all)]
    async fn sweep_expired(&self) -> Result<u64, JwtBlacklistStoreError> {
        let result = sqlx::query("DELETE FROM jwt_blacklist WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| JwtBlacklistStoreError::UnexpectedError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
