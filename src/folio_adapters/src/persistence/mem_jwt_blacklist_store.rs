use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use folio_core::{Clock, JwtBlacklistStore, JwtBlacklistStoreError, UserId};

/// In-memory access-token denylist keyed by jti.
pub struct MemJwtBlacklistStore {
    entries: DashMap<String, BlacklistEntry>,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone)]
struct BlacklistEntry {
    #[allow(dead_code)]
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

impl MemJwtBlacklistStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }
}

#[async_trait::async_trait]
impl JwtBlacklistStore for MemJwtBlacklistStore {
    async fn add(
        &self,
        user_id: UserId,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), JwtBlacklistStoreError> {
        self.entries
            .insert(jti.to_string(), BlacklistEntry { user_id, expires_at });
        Ok(())
    }

    async fn contains(&self, jti: &str) -> Result<bool, JwtBlacklistStoreError> {
        Ok(self.entries.contains_key(jti))
    }

    async fn sweep_expired(&self) -> Result<u64, JwtBlacklistStoreError> {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        Ok((before - self.entries.len()) as u64)
    }
}
