use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use folio_core::{
    Clock, IssuedToken, TokenClaims, TokenKind, TokenSigner, TokenSignerError, UserId,
};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone)]
pub struct JwtSignerConfig {
    pub access_secret: Secret<String>,
    pub refresh_secret: Secret<String>,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
}

/// Wire form of the claims. `sub` carries the user id, `jti` a random UUID
/// used for blacklist and rotation bookkeeping.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    jti: String,
}

/// HMAC-SHA256 signer with one independent key per token class, so a
/// compromised refresh secret cannot forge access tokens and vice versa.
#[derive(Clone)]
pub struct JwtTokenSigner {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenSigner {
    pub fn new(config: JwtSignerConfig, clock: Arc<dyn Clock>) -> Self {
        let access_bytes = config.access_secret.expose_secret().as_bytes();
        let refresh_bytes = config.refresh_secret.expose_secret().as_bytes();
        Self {
            access_encoding: EncodingKey::from_secret(access_bytes),
            access_decoding: DecodingKey::from_secret(access_bytes),
            refresh_encoding: EncodingKey::from_secret(refresh_bytes),
            refresh_decoding: DecodingKey::from_secret(refresh_bytes),
            access_ttl: Duration::seconds(config.access_ttl_seconds),
            refresh_ttl: Duration::seconds(config.refresh_ttl_seconds),
            clock,
        }
    }

    fn encoding_key(&self, kind: TokenKind) -> &EncodingKey {
        match kind {
            TokenKind::Access => &self.access_encoding,
            TokenKind::Refresh => &self.refresh_encoding,
        }
    }

    fn decoding_key(&self, kind: TokenKind) -> &DecodingKey {
        match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        }
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }
}

impl TokenSigner for JwtTokenSigner {
    fn issue(&self, kind: TokenKind, user_id: UserId) -> Result<IssuedToken, TokenSignerError> {
        let issued_at = self.clock.now();
        let expires_at = issued_at + self.ttl(kind);
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: jti.clone(),
        };

        let token = encode(&Header::default(), &claims, self.encoding_key(kind))
            .map_err(|e| TokenSignerError::UnexpectedError(e.to_string()))?;

        Ok(IssuedToken {
            token,
            claims: TokenClaims {
                user_id,
                issued_at,
                expires_at,
                jti,
            },
        })
    }

    fn verify(&self, kind: TokenKind, token: &str) -> Result<TokenClaims, TokenSignerError> {
        let data = decode::<Claims>(token, self.decoding_key(kind), &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenSignerError::Expired,
                ErrorKind::InvalidSignature => TokenSignerError::InvalidSignature,
                _ => TokenSignerError::Malformed,
            })?;

        let user_id: UserId = data
            .claims
            .sub
            .parse()
            .map_err(|_| TokenSignerError::Malformed)?;

        Ok(TokenClaims {
            user_id,
            issued_at: timestamp_to_datetime(data.claims.iat)?,
            expires_at: timestamp_to_datetime(data.claims.exp)?,
            jti: data.claims.jti,
        })
    }
}

fn timestamp_to_datetime(timestamp: i64) -> Result<DateTime<Utc>, TokenSignerError> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .ok_or(TokenSignerError::Malformed)
}
