use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use dashmap::DashMap;
use folio_core::{
    Clock, TokenPurpose, UserId, VerificationTokenRecord, VerificationTokenStore,
    VerificationTokenStoreError,
};

use crate::auth::token_digest;
use crate::persistence::{VerificationTtls, generate_raw_token};

/// In-memory verification token store keyed by token digest.
pub struct MemVerificationTokenStore {
    records: DashMap<String, VerificationTokenRecord>,
    next_id: AtomicI64,
    ttls: VerificationTtls,
    clock: Arc<dyn Clock>,
}

impl MemVerificationTokenStore {
    pub fn new(ttls: VerificationTtls, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicI64::new(1),
            ttls,
            clock,
        }
    }
}

#[async_trait::async_trait]
impl VerificationTokenStore for MemVerificationTokenStore {
    async fn issue(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
        pending_email: Option<String>,
    ) -> Result<String, VerificationTokenStoreError> {
        let raw = generate_raw_token();
        let now = self.clock.now();
        let record = VerificationTokenRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id,
            purpose,
            pending_email,
            created_at: now,
            expires_at: now + self.ttls.for_purpose(purpose),
            used: false,
            used_at: None,
        };
        self.records.insert(token_digest(&raw), record);
        Ok(raw)
    }

    async fn redeem(
        &self,
        raw_token: &str,
        expected_purpose: TokenPurpose,
    ) -> Result<VerificationTokenRecord, VerificationTokenStoreError> {
        let record = self
            .records
            .get(&token_digest(raw_token))
            .map(|entry| entry.clone())
            .ok_or(VerificationTokenStoreError::TokenNotFound)?;

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

    async fn mark_used(&self, token_id: i64) -> Result<(), VerificationTokenStoreError> {
        for mut entry in self.records.iter_mut() {
            if entry.id == token_id {
                if entry.used {
                    return Err(VerificationTokenStoreError::AlreadyUsed);
                }
                entry.used = true;
                entry.used_at = Some(self.clock.now());
                return Ok(());
            }
        }
        Err(VerificationTokenStoreError::TokenNotFound)
    }

    async fn invalidate_all_for_purpose(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
    ) -> Result<u64, VerificationTokenStoreError> {
        let now = self.clock.now();
        let mut invalidated = 0;
        for mut entry in self.records.iter_mut() {
            if entry.user_id == user_id && entry.purpose == purpose && !entry.used {
                entry.used = true;
                entry.used_at = Some(now);
                invalidated += 1;
            }
        }
        Ok(invalidated)
    }

    async fn sweep_expired(&self) -> Result<u64, VerificationTokenStoreError> {
        let now = self.clock.now();
        let before = self.records.len();
        self.records.retain(|_, record| record.expires_at > now);
        Ok((before - self.records.len()) as u64)
    }
}
