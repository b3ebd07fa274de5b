use folio_core::{
    TokenPurpose, UserStore, UserStoreError, VerificationTokenStore, VerificationTokenStoreError,
};

/// Error types specific to verify-email use case
#[derive(Debug, thiserror::Error)]
pub enum VerifyEmailError {
    #[error("Verification token error: {0}")]
    VerificationTokenStoreError(#[from] VerificationTokenStoreError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
}

/// Verify-email use case - redeems a VERIFY_EMAIL token and flips the
/// user's verified flag. The token is consumed only after the flag is set,
/// so a crash in between leaves it redeemable.
pub struct VerifyEmailUseCase<V, U>
where
    V: VerificationTokenStore,
    U: UserStore,
{
    verification_tokens: V,
    user_store: U,
}

impl<V, U> VerifyEmailUseCase<V, U>
where
    V: VerificationTokenStore,
    U: UserStore,
{
    pub fn new(verification_tokens: V, user_store: U) -> Self {
        Self {
            verification_tokens,
            user_store,
        }
    }

    #[tracing::instrument(name = "VerifyEmailUseCase::execute", skip_all)]
    pub async fn execute(&self, raw_token: &str) -> Result<(), VerifyEmailError> {
        let record = self
            .verification_tokens
            .redeem(raw_token, TokenPurpose::VerifyEmail)
            .await?;

        self.user_store.set_email_verified(record.user_id).await?;

        self.verification_tokens.mark_used(record.id).await?;

        Ok(())
    }
}
