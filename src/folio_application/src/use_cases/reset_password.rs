use folio_core::{
    Password, PasswordHasher, PasswordHasherError, RefreshTokenStore, RefreshTokenStoreError,
    TokenPurpose, UserStore, UserStoreError, VerificationTokenStore, VerificationTokenStoreError,
};

/// Error types specific to reset-password use case
#[derive(Debug, thiserror::Error)]
pub enum ResetPasswordError {
    #[error("Verification token error: {0}")]
    VerificationTokenStoreError(#[from] VerificationTokenStoreError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("Password hasher error: {0}")]
    PasswordHasherError(#[from] PasswordHasherError),
    #[error("Refresh token store error: {0}")]
    RefreshTokenStoreError(#[from] RefreshTokenStoreError),
}

/// Reset-password use case - redeems a RESET_PASSWORD token, stores the new
/// password hash, and revokes every outstanding refresh token so all
/// existing sessions must log in again.
pub struct ResetPasswordUseCase<V, U, P, R>
where
    V: VerificationTokenStore,
    U: UserStore,
    P: PasswordHasher,
    R: RefreshTokenStore,
{
    verification_tokens: V,
    user_store: U,
    password_hasher: P,
    refresh_token_store: R,
}

impl<V, U, P, R> ResetPasswordUseCase<V, U, P, R>
where
    V: VerificationTokenStore,
    U: UserStore,
    P: PasswordHasher,
    R: RefreshTokenStore,
{
    pub fn new(
        verification_tokens: V,
        user_store: U,
        password_hasher: P,
        refresh_token_store: R,
    ) -> Self {
        Self {
            verification_tokens,
            user_store,
            password_hasher,
            refresh_token_store,
        }
    }

    #[tracing::instrument(name = "ResetPasswordUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        raw_token: &str,
        new_password: Password,
    ) -> Result<(), ResetPasswordError> {
        let record = self
            .verification_tokens
            .redeem(raw_token, TokenPurpose::ResetPassword)
            .await?;

        let password_hash = self.password_hasher.hash(new_password).await?;
        self.user_store
            .set_password_hash(record.user_id, password_hash)
            .await?;

        self.verification_tokens.mark_used(record.id).await?;

        let revoked = self
            .refresh_token_store
            .revoke_all_for_user(record.user_id)
            .await?;
        tracing::info!(
            user_id = record.user_id,
            revoked,
            "revoked refresh tokens after password reset"
        );

        Ok(())
    }
}
