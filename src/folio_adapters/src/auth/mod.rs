pub mod argon2_hasher;
pub mod jwt_signer;
pub mod token_hash;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_signer::{JwtSignerConfig, JwtTokenSigner};
pub use token_hash::token_digest;

use folio_core::{
    JwtBlacklistStore, TokenClaims, TokenKind, TokenSigner, TokenSignerError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessTokenError {
    #[error("{0}")]
    Signer(#[from] TokenSignerError),
    #[error("Token has been revoked")]
    Blacklisted,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// Full validation for a protected-request access token: signature and
/// expiry first, then the blacklist. A logged-out token is still
/// signature-valid, so the blacklist check is not optional.
pub async fn validate_access_token<S, B>(
    token_signer: &S,
    jwt_blacklist: &B,
    token: &str,
) -> Result<TokenClaims, AccessTokenError>
where
    S: TokenSigner,
    B: JwtBlacklistStore,
{
    let claims = token_signer.verify(TokenKind::Access, token)?;

    let blacklisted = jwt_blacklist
        .contains(&claims.jti)
        .await
        .map_err(|e| AccessTokenError::UnexpectedError(e.to_string()))?;

    if blacklisted {
        return Err(AccessTokenError::Blacklisted);
    }

    Ok(claims)
}
