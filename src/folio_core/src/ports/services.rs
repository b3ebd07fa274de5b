use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::Secret;
use thiserror::Error;

use crate::domain::{
    email::Email,
    password::Password,
    token::{TokenKind, TokenPurpose},
    user::UserId,
};

// EmailClient port trait and errors
#[derive(Debug, Error)]
pub enum EmailClientError {
    #[error("Email delivery failed: {0}")]
    DeliveryError(String),
}

/// Port trait for the outbound email collaborator. Implementations format
/// the purpose-specific link around the raw token themselves.
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_verification_link(
        &self,
        recipient: &Email,
        purpose: TokenPurpose,
        raw_token: &str,
    ) -> Result<(), EmailClientError>;
}

// Clock port - all expiry computations go through this so tests can move
// time around.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.write().expect("clock lock poisoned");
        *now = *now + delta;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        let mut now = self.now.write().expect("clock lock poisoned");
        *now = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().expect("clock lock poisoned")
    }
}

// PasswordHasher port trait and errors
#[derive(Debug, Error)]
pub enum PasswordHasherError {
    #[error("Incorrect password")]
    Mismatch,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for PasswordHasherError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Mismatch, Self::Mismatch) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: Password) -> Result<Secret<String>, PasswordHasherError>;

    async fn verify(
        &self,
        candidate: Password,
        expected_hash: Secret<String>,
    ) -> Result<(), PasswordHasherError>;
}

// TokenSigner port trait and errors
#[derive(Debug, Error)]
pub enum TokenSignerError {
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("Token has expired")]
    Expired,
    #[error("Malformed token")]
    Malformed,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for TokenSignerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidSignature, Self::InvalidSignature) => true,
            (Self::Expired, Self::Expired) => true,
            (Self::Malformed, Self::Malformed) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// Claims carried by every signed token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

/// Stateless HMAC signer for the two token classes. The access and refresh
/// keys are independent so one compromised secret cannot forge the other
/// class.
pub trait TokenSigner: Send + Sync {
    fn issue(&self, kind: TokenKind, user_id: UserId) -> Result<IssuedToken, TokenSignerError>;

    fn verify(&self, kind: TokenKind, token: &str) -> Result<TokenClaims, TokenSignerError>;
}

// Forwarding impls so handlers can share one collaborator behind an Arc.

#[async_trait]
impl<T> EmailClient for Arc<T>
where
    T: EmailClient + ?Sized,
{
    async fn send_verification_link(
        &self,
        recipient: &Email,
        purpose: TokenPurpose,
        raw_token: &str,
    ) -> Result<(), EmailClientError> {
        (**self)
            .send_verification_link(recipient, purpose, raw_token)
            .await
    }
}

#[async_trait]
impl<T> PasswordHasher for Arc<T>
where
    T: PasswordHasher + ?Sized,
{
    async fn hash(&self, password: Password) -> Result<Secret<String>, PasswordHasherError> {
        (**self).hash(password).await
    }

    async fn verify(
        &self,
        candidate: Password,
        expected_hash: Secret<String>,
    ) -> Result<(), PasswordHasherError> {
        (**self).verify(candidate, expected_hash).await
    }
}

impl<T> TokenSigner for Arc<T>
where
    T: TokenSigner + ?Sized,
{
    fn issue(&self, kind: TokenKind, user_id: UserId) -> Result<IssuedToken, TokenSignerError> {
        (**self).issue(kind, user_id)
    }

    fn verify(&self, kind: TokenKind, token: &str) -> Result<TokenClaims, TokenSignerError> {
        (**self).verify(kind, token)
    }
}
