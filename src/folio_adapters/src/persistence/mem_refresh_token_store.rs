use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use folio_core::{Clock, RefreshTokenRecord, RefreshTokenStore, RefreshTokenStoreError, UserId};

use crate::auth::token_digest;

/// In-memory refresh token store keyed by token digest.
pub struct MemRefreshTokenStore {
    records: DashMap<String, RefreshTokenRecord>,
    clock: Arc<dyn Clock>,
}

impl MemRefreshTokenStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: DashMap::new(),
            clock,
        }
    }

    #[cfg(test)]
    fn active_count(&self) -> usize {
        self.records.iter().filter(|entry| !entry.revoked).count()
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for MemRefreshTokenStore {
    async fn save(
        &self,
        user_id: UserId,
        raw_token: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RefreshTokenStoreError> {
        self.records.insert(
            token_digest(raw_token),
            RefreshTokenRecord {
                user_id,
                issued_at,
                expires_at,
                revoked: false,
                replaced_by: None,
            },
        );
        Ok(())
    }

    async fn find(&self, raw_token: &str) -> Result<RefreshTokenRecord, RefreshTokenStoreError> {
        self.records
            .get(&token_digest(raw_token))
            .map(|entry| entry.clone())
            .ok_or(RefreshTokenStoreError::TokenNotFound)
    }

    async fn revoke(&self, raw_token: &str) -> Result<(), RefreshTokenStoreError> {
        let mut record = self
            .records
            .get_mut(&token_digest(raw_token))
            .ok_or(RefreshTokenStoreError::TokenNotFound)?;
        record.revoked = true;
        Ok(())
    }

    async fn rotate(
        &self,
        old_raw_token: &str,
        new_raw_token: &str,
        new_jti: &str,
        user_id: UserId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RefreshTokenStoreError> {
        {
            let mut old = self
                .records
                .get_mut(&token_digest(old_raw_token))
                .ok_or(RefreshTokenStoreError::TokenNotFound)?;
            if old.revoked {
                return Err(RefreshTokenStoreError::AlreadyRotated);
            }
            old.revoked = true;
            old.replaced_by = Some(new_jti.to_string());
            // Guard dropped here before touching another shard.
        }

        self.records.insert(
            token_digest(new_raw_token),
            RefreshTokenRecord {
                user_id,
                issued_at,
                expires_at,
                revoked: false,
                replaced_by: None,
            },
        );
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: UserId) -> Result<u64, RefreshTokenStoreError> {
        let mut revoked = 0;
        for mut entry in self.records.iter_mut() {
            if entry.user_id == user_id && !entry.revoked {
                entry.revoked = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn sweep_expired(&self) -> Result<u64, RefreshTokenStoreError> {
        let now = self.clock.now();
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_expired(now));
        Ok((before - self.records.len()) as u64)
    }
}
