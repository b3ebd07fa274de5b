use folio_core::{
    Email, EmailClient, EmailClientError, TokenPurpose, UserStore, UserStoreError,
    VerificationTokenStore, VerificationTokenStoreError,
};

/// Error types specific to forgot-password use case
#[derive(Debug, thiserror::Error)]
pub enum ForgotPasswordError {
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
    #[error("Verification token store error: {0}")]
    VerificationTokenStoreError(#[from] VerificationTokenStoreError),
    #[error("There was an error sending the email. Try again later!")]
    EmailError(#[source] EmailClientError),
}

/// Forgot-password use case - issues a RESET_PASSWORD token and mails the
/// link. Unknown emails succeed silently so the endpoint never reveals
/// whether an account exists.
pub struct ForgotPasswordUseCase<U, V, E>
where
    U: UserStore,
    V: VerificationTokenStore,
    E: EmailClient,
{
    user_store: U,
    verification_tokens: V,
    email_client: E,
}

impl<U, V, E> ForgotPasswordUseCase<U, V, E>
where
    U: UserStore,
    V: VerificationTokenStore,
    E: EmailClient,
{
    pub fn new(user_store: U, verification_tokens: V, email_client: E) -> Self {
        Self {
            user_store,
            verification_tokens,
            email_client,
        }
    }

    #[tracing::instrument(name = "ForgotPasswordUseCase::execute", skip_all)]
    pub async fn execute(&self, email: Email) -> Result<(), ForgotPasswordError> {
        let user = match self.user_store.find_by_email(&email).await {
            Ok(user) => user,
            Err(UserStoreError::UserNotFound) => return Ok(()),
            Err(e) => return Err(ForgotPasswordError::UserStoreError(e)),
        };

        // Only the latest reset link stays redeemable.
        self.verification_tokens
            .invalidate_all_for_purpose(user.id, TokenPurpose::ResetPassword)
            .await?;

        let raw_token = self
            .verification_tokens
            .issue(user.id, TokenPurpose::ResetPassword, None)
            .await?;

        if let Err(e) = self
            .email_client
            .send_verification_link(&user.email, TokenPurpose::ResetPassword, &raw_token)
            .await
        {
            if let Err(cleanup) = self
                .verification_tokens
                .invalidate_all_for_purpose(user.id, TokenPurpose::ResetPassword)
                .await
            {
                tracing::warn!(user_id = user.id, error = %cleanup, "failed to invalidate undelivered reset token");
            }
            return Err(ForgotPasswordError::EmailError(e));
        }

        Ok(())
    }
}
