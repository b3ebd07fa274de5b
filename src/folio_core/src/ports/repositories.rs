use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::Secret;
use thiserror::Error;

use crate::domain::{
    email::Email,
    token::TokenPurpose,
    user::{NewUser, User, UserId},
};

// UserStore port trait and errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UserAlreadyExists, Self::UserAlreadyExists) => true,
            (Self::UserNotFound, Self::UserNotFound) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn add_user(&self, user: NewUser) -> Result<User, UserStoreError>;
    async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError>;
    async fn find_by_id(&self, id: UserId) -> Result<User, UserStoreError>;
    async fn email_exists(&self, email: &Email) -> Result<bool, UserStoreError>;
    async fn set_email_verified(&self, id: UserId) -> Result<(), UserStoreError>;
    async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: Secret<String>,
    ) -> Result<(), UserStoreError>;
}

// RefreshTokenStore port trait and errors
#[derive(Debug, Error)]
pub enum RefreshTokenStoreError {
    #[error("Refresh token not found")]
    TokenNotFound,
    #[error("Refresh token already rotated or revoked")]
    AlreadyRotated,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for RefreshTokenStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::TokenNotFound, Self::TokenNotFound) => true,
            (Self::AlreadyRotated, Self::AlreadyRotated) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// One persisted refresh credential. Only the digest of the raw token is
/// ever stored; `replaced_by` records the jti of the successor when the
/// token was rotated.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub replaced_by: Option<String>,
}

impl RefreshTokenRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn save(
        &self,
        user_id: UserId,
        raw_token: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RefreshTokenStoreError>;

    /// Look up the record for a presented raw token (by digest).
    async fn find(&self, raw_token: &str) -> Result<RefreshTokenRecord, RefreshTokenStoreError>;

    async fn revoke(&self, raw_token: &str) -> Result<(), RefreshTokenStoreError>;

    /// Atomically revoke the old token, mark it as replaced by `new_jti`,
    /// and persist the new token. Fails with `AlreadyRotated` if the old
    /// token is no longer active; in that case the new token must not be
    /// persisted either.
    async fn rotate(
        &self,
        old_raw_token: &str,
        new_raw_token: &str,
        new_jti: &str,
        user_id: UserId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RefreshTokenStoreError>;

    async fn revoke_all_for_user(&self, user_id: UserId) -> Result<u64, RefreshTokenStoreError>;

    async fn sweep_expired(&self) -> Result<u64, RefreshTokenStoreError>;
}

// JwtBlacklistStore port trait and errors
#[derive(Debug, Error)]
pub enum JwtBlacklistStoreError {
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// Denylist of access-token identifiers revoked before their natural
/// expiry. Entries become garbage once the token itself would have expired.
#[async_trait]
pub trait JwtBlacklistStore: Send + Sync {
    async fn add(
        &self,
        user_id: UserId,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), JwtBlacklistStoreError>;

    async fn contains(&self, jti: &str) -> Result<bool, JwtBlacklistStoreError>;

    async fn sweep_expired(&self) -> Result<u64, JwtBlacklistStoreError>;
}

// VerificationTokenStore port trait and errors
#[derive(Debug, Error)]
pub enum VerificationTokenStoreError {
    #[error("Invalid verification token")]
    TokenNotFound,
    #[error("Token purpose mismatch")]
    PurposeMismatch,
    #[error("Token has already been used")]
    AlreadyUsed,
    #[error("Token has expired")]
    Expired,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for VerificationTokenStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::TokenNotFound, Self::TokenNotFound) => true,
            (Self::PurposeMismatch, Self::PurposeMismatch) => true,
            (Self::AlreadyUsed, Self::AlreadyUsed) => true,
            (Self::Expired, Self::Expired) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VerificationTokenRecord {
    pub id: i64,
    pub user_id: UserId,
    pub purpose: TokenPurpose,
    pub pending_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait VerificationTokenStore: Send + Sync {
    /// Generate and persist a single-use token, returning the raw value for
    /// the emailed link. The raw value is never stored.
    async fn issue(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
        pending_email: Option<String>,
    ) -> Result<String, VerificationTokenStoreError>;

    /// Validate a presented raw token without consuming it. Checks, in
    /// order: existence, purpose, expiry, used flag. Callers flip the used
    /// flag with `mark_used` only after the purpose-specific side effect
    /// has been applied.
    async fn redeem(
        &self,
        raw_token: &str,
        expected_purpose: TokenPurpose,
    ) -> Result<VerificationTokenRecord, VerificationTokenStoreError>;

    /// Conditionally flip `used` to true. At most one caller ever succeeds
    /// for a given token; later callers get `AlreadyUsed`.
    async fn mark_used(&self, token_id: i64) -> Result<(), VerificationTokenStoreError>;

    async fn invalidate_all_for_purpose(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
    ) -> Result<u64, VerificationTokenStoreError>;

    async fn sweep_expired(&self) -> Result<u64, VerificationTokenStoreError>;
}

// Forwarding impls so handlers can share one store behind an Arc.

#[async_trait]
impl<T> UserStore for Arc<T>
where
    T: UserStore + ?Sized,
{
    async fn add_user(&self, user: NewUser) -> Result<User, UserStoreError> {
        (**self).add_user(user).await
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        (**self).find_by_email(email).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, UserStoreError> {
        (**self).find_by_id(id).await
    }

    async fn email_exists(&self, email: &Email) -> Result<bool, UserStoreError> {
        (**self).email_exists(email).await
    }

    async fn set_email_verified(&self, id: UserId) -> Result<(), UserStoreError> {
        (**self).set_email_verified(id).await
    }

    async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: Secret<String>,
    ) -> Result<(), UserStoreError> {
        (**self).set_password_hash(id, password_hash).await
    }
}

#[async_trait]
impl<T> RefreshTokenStore for Arc<T>
where
    T: RefreshTokenStore + ?Sized,
{
    async fn save(
        &self,
        user_id: UserId,
        raw_token: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RefreshTokenStoreError> {
        (**self).save(user_id, raw_token, issued_at, expires_at).await
    }

    async fn find(&self, raw_token: &str) -> Result<RefreshTokenRecord, RefreshTokenStoreError> {
        (**self).find(raw_token).await
    }

    async fn revoke(&self, raw_token: &str) -> Result<(), RefreshTokenStoreError> {
        (**self).revoke(raw_token).await
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
        (**self)
            .rotate(old_raw_token, new_raw_token, new_jti, user_id, issued_at, expires_at)
            .await
    }

    async fn revoke_all_for_user(&self, user_id: UserId) -> Result<u64, RefreshTokenStoreError> {
        (**self).revoke_all_for_user(user_id).await
    }

    async fn sweep_expired(&self) -> Result<u64, RefreshTokenStoreError> {
        (**self).sweep_expired().await
    }
}

#[async_trait]
impl<T> JwtBlacklistStore for Arc<T>
where
    T: JwtBlacklistStore + ?Sized,
{
    async fn add(
        &self,
        user_id: UserId,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), JwtBlacklistStoreError> {
        (**self).add(user_id, jti, expires_at).await
    }

    async fn contains(&self, jti: &str) -> Result<bool, JwtBlacklistStoreError> {
        (**self).contains(jti).await
    }

    async fn sweep_expired(&self) -> Result<u64, JwtBlacklistStoreError> {
        (**self).sweep_expired().await
    }
}

#[async_trait]
impl<T> VerificationTokenStore for Arc<T>
where
    T: VerificationTokenStore + ?Sized,
{
    async fn issue(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
        pending_email: Option<String>,
    ) -> Result<String, VerificationTokenStoreError> {
        (**self).issue(user_id, purpose, pending_email).await
    }

    async fn redeem(
        &self,
        raw_token: &str,
        expected_purpose: TokenPurpose,
    ) -> Result<VerificationTokenRecord, VerificationTokenStoreError> {
        (**self).redeem(raw_token, expected_purpose).await
    }

    async fn mark_used(&self, token_id: i64) -> Result<(), VerificationTokenStoreError> {
        (**self).mark_used(token_id).await
    }

    async fn invalidate_all_for_purpose(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
    ) -> Result<u64, VerificationTokenStoreError> {
        (**self).invalidate_all_for_purpose(user_id, purpose).await
    }

    async fn sweep_expired(&self) -> Result<u64, VerificationTokenStoreError> {
        (**self).sweep_expired().await
    }
}
