use folio_core::{
    JwtBlacklistStore, JwtBlacklistStoreError, RefreshTokenStore, RefreshTokenStoreError,
    TokenKind, TokenSigner,
};

/// Error types for logout use case
#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error("Invalid access token")]
    InvalidAccessToken,
    #[error("Refresh token not found")]
    RefreshTokenNotFound,
    #[error("Blacklist store error: {0}")]
    JwtBlacklistStoreError(#[from] JwtBlacklistStoreError),
    #[error("Refresh token store error: {0}")]
    RefreshTokenStoreError(RefreshTokenStoreError),
}

/// Logout use case - blacklists the access token for its remaining natural
/// lifetime and revokes the presented refresh token.
pub struct LogoutUseCase<S, B, R>
where
    S: TokenSigner,
    B: JwtBlacklistStore,
    R: RefreshTokenStore,
{
    token_signer: S,
    jwt_blacklist: B,
    refresh_token_store: R,
}

impl<S, B, R> LogoutUseCase<S, B, R>
where
    S: TokenSigner,
    B: JwtBlacklistStore,
    R: RefreshTokenStore,
{
    pub fn new(token_signer: S, jwt_blacklist: B, refresh_token_store: R) -> Self {
        Self {
            token_signer,
            jwt_blacklist,
            refresh_token_store,
        }
    }

    #[tracing::instrument(name = "LogoutUseCase::execute", skip_all)]
    pub async fn execute(&self, access_token: &str, refresh_token: &str) -> Result<(), LogoutError> {
        let claims = self
            .token_signer
            .verify(TokenKind::Access, access_token)
            .map_err(|_| LogoutError::InvalidAccessToken)?;

        // The access token stays signature-valid until it expires, so it is
        // denylisted by jti for exactly that window.
        self.jwt_blacklist
            .add(claims.user_id, &claims.jti, claims.expires_at)
            .await?;

        self.refresh_token_store
            .revoke(refresh_token)
            .await
            .map_err(|e| match e {
                RefreshTokenStoreError::TokenNotFound => LogoutError::RefreshTokenNotFound,
                e => LogoutError::RefreshTokenStoreError(e),
            })?;

        Ok(())
    }
}
