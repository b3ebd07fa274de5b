use folio_core::{
    Email, EmailClient, EmailClientError, TokenPurpose, UserStore, UserStoreError,
    VerificationTokenStore, VerificationTokenStoreError,
};

/// Error types specific to resend-verification use case
#[derive(Debug, thiserror::Error)]
pub enum ResendVerificationError {
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
    #[error("Verification token store error: {0}")]
    VerificationTokenStoreError(#[from] VerificationTokenStoreError),
    #[error("There was an error sending the email. Try again later!")]
    EmailError(#[source] EmailClientError),
}

/// Resend-verification use case - invalidates outstanding VERIFY_EMAIL
/// tokens and dispatches a fresh link. Unknown or already-verified emails
/// succeed silently so the endpoint never reveals account existence.
pub struct ResendVerificationUseCase<U, V, E>
where
    U: UserStore,
    V: VerificationTokenStore,
    E: EmailClient,
{
    user_store: U,
    verification_tokens: V,
    email_client: E,
}

impl<U, V, E> ResendVerificationUseCase<U, V, E>
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

    #[tracing::instrument(name = "ResendVerificationUseCase::execute", skip_all)]
    pub async fn execute(&self, email: Email) -> Result<(), ResendVerificationError> {
        let user = match self.user_store.find_by_email(&email).await {
            Ok(user) => user,
            Err(UserStoreError::UserNotFound) => return Ok(()),
            Err(e) => return Err(ResendVerificationError::UserStoreError(e)),
        };

        if user.email_verified {
            return Ok(());
        }

        self.verification_tokens
            .invalidate_all_for_purpose(user.id, TokenPurpose::VerifyEmail)
            .await?;

        let raw_token = self
            .verification_tokens
            .issue(user.id, TokenPurpose::VerifyEmail, None)
            .await?;

        if let Err(e) = self
            .email_client
            .send_verification_link(&user.email, TokenPurpose::VerifyEmail, &raw_token)
            .await
        {
            if let Err(cleanup) = self
                .verification_tokens
                .invalidate_all_for_purpose(user.id, TokenPurpose::VerifyEmail)
                .await
            {
                tracing::warn!(user_id = user.id, error = %cleanup, "failed to invalidate undelivered verification token");
            }
            return Err(ResendVerificationError::EmailError(e));
        }

        Ok(())
    }
}
