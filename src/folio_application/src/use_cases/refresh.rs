use std::sync::Arc;

use folio_core::{
    Clock, RefreshTokenStore, RefreshTokenStoreError, TokenKind, TokenSigner, TokenSignerError,
    UserStore, UserStoreError,
};

use crate::use_cases::login::AuthenticatedSession;

/// Error types specific to refresh use case. Every variant maps to
/// Unauthorized at the boundary; the distinctions exist for logging.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("Invalid refresh token")]
    InvalidToken,
    #[error("Refresh token has been revoked")]
    TokenRevoked,
    #[error("Refresh token has expired")]
    TokenExpired,
    #[error("User not found")]
    UserNotFound,
    #[error("Token signer error: {0}")]
    TokenSignerError(TokenSignerError),
    #[error("Refresh token store error: {0}")]
    RefreshTokenStoreError(RefreshTokenStoreError),
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
}

/// Refresh use case - rotates a refresh token into a new access/refresh
/// pair. Each raw refresh token is honored exactly once; a second
/// presentation observes the revoked record and fails.
pub struct RefreshUseCase<S, R, U>
where
    S: TokenSigner,
    R: RefreshTokenStore,
    U: UserStore,
{
    token_signer: S,
    refresh_token_store: R,
    user_store: U,
    clock: Arc<dyn Clock>,
}

impl<S, R, U> RefreshUseCase<S, R, U>
where
    S: TokenSigner,
    R: RefreshTokenStore,
    U: UserStore,
{
    pub fn new(token_signer: S, refresh_token_store: R, user_store: U, clock: Arc<dyn Clock>) -> Self {
        Self {
            token_signer,
            refresh_token_store,
            user_store,
            clock,
        }
    }

    #[tracing::instrument(name = "RefreshUseCase::execute", skip_all)]
    pub async fn execute(&self, raw_refresh_token: &str) -> Result<AuthenticatedSession, RefreshError> {
        self.token_signer
            .verify(TokenKind::Refresh, raw_refresh_token)
            .map_err(|_| RefreshError::InvalidToken)?;

        let record = self
            .refresh_token_store
            .find(raw_refresh_token)
            .await
            .map_err(|e| match e {
                RefreshTokenStoreError::TokenNotFound => RefreshError::InvalidToken,
                e => RefreshError::RefreshTokenStoreError(e),
            })?;

        if record.revoked {
            tracing::warn!(
                user_id = record.user_id,
                replaced_by = ?record.replaced_by,
                "revoked refresh token presented; possible replay of a rotated token"
            );
            return Err(RefreshError::TokenRevoked);
        }

        if record.is_expired(self.clock.now()) {
            return Err(RefreshError::TokenExpired);
        }

        let user = self
            .user_store
            .find_by_id(record.user_id)
            .await
            .map_err(|e| match e {
                UserStoreError::UserNotFound => RefreshError::UserNotFound,
                e => RefreshError::UserStoreError(e),
            })?;

        let access = self
            .token_signer
            .issue(TokenKind::Access, user.id)
            .map_err(RefreshError::TokenSignerError)?;
        let refresh = self
            .token_signer
            .issue(TokenKind::Refresh, user.id)
            .map_err(RefreshError::TokenSignerError)?;

        // Single transaction: if a concurrent refresh won the race, this
        // fails and the new pair is discarded.
        self.refresh_token_store
            .rotate(
                raw_refresh_token,
                &refresh.token,
                &refresh.claims.jti,
                user.id,
                refresh.claims.issued_at,
                refresh.claims.expires_at,
            )
            .await
            .map_err(|e| match e {
                RefreshTokenStoreError::AlreadyRotated
                | RefreshTokenStoreError::TokenNotFound => RefreshError::TokenRevoked,
                e => RefreshError::RefreshTokenStoreError(e),
            })?;

        Ok(AuthenticatedSession {
            access_token: access.token,
            refresh_token: refresh.token,
            expires_in_ms: (access.claims.expires_at - access.claims.issued_at).num_milliseconds(),
            email: user.email,
            role: user.role,
        })
    }
}
