use folio_core::{
    Credential, Email, EmailClient, EmailClientError, NewUser, Password, PasswordHasher,
    PasswordHasherError, Role, TokenPurpose, UserStatus, UserStore, UserStoreError,
    VerificationTokenStore, VerificationTokenStoreError,
};

/// Error types specific to signup use case
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("Email already registered")]
    EmailAlreadyRegistered,
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
    #[error("Password hasher error: {0}")]
    PasswordHasherError(#[from] PasswordHasherError),
    #[error("Verification token store error: {0}")]
    VerificationTokenStoreError(#[from] VerificationTokenStoreError),
    #[error("There was an error sending the email. Try again later!")]
    EmailError(#[source] EmailClientError),
}

/// Signup use case - registers a local-credential account and dispatches
/// the verification link. The account stays unverified (and unable to log
/// in) until the link is redeemed.
pub struct SignupUseCase<U, P, V, E>
where
    U: UserStore,
    P: PasswordHasher,
    V: VerificationTokenStore,
    E: EmailClient,
{
    user_store: U,
    password_hasher: P,
    verification_tokens: V,
    email_client: E,
}

impl<U, P, V, E> SignupUseCase<U, P, V, E>
where
    U: UserStore,
    P: PasswordHasher,
    V: VerificationTokenStore,
    E: EmailClient,
{
    pub fn new(user_store: U, password_hasher: P, verification_tokens: V, email_client: E) -> Self {
        Self {
            user_store,
            password_hasher,
            verification_tokens,
            email_client,
        }
    }

    #[tracing::instrument(name = "SignupUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        email: Email,
        password: Password,
        full_name: String,
    ) -> Result<(), SignupError> {
        if self
            .user_store
            .email_exists(&email)
            .await
            .map_err(SignupError::UserStoreError)?
        {
            return Err(SignupError::EmailAlreadyRegistered);
        }

        let password_hash = self.password_hasher.hash(password).await?;

        let user = self
            .user_store
            .add_user(NewUser {
                email,
                full_name,
                credential: Credential::Local { password_hash },
                role: Role::User,
                email_verified: false,
                status: UserStatus::Active,
            })
            .await
            .map_err(|e| match e {
                UserStoreError::UserAlreadyExists => SignupError::EmailAlreadyRegistered,
                e => SignupError::UserStoreError(e),
            })?;

        let raw_token = self
            .verification_tokens
            .issue(user.id, TokenPurpose::VerifyEmail, None)
            .await?;

        if let Err(e) = self
            .email_client
            .send_verification_link(&user.email, TokenPurpose::VerifyEmail, &raw_token)
            .await
        {
            // The caller never received the link, so the token must not stay
            // redeemable. The account itself survives; a resend re-issues.
            if let Err(cleanup) = self
                .verification_tokens
                .invalidate_all_for_purpose(user.id, TokenPurpose::VerifyEmail)
                .await
            {
                tracing::warn!(user_id = user.id, error = %cleanup, "failed to invalidate undelivered verification token");
            }
            return Err(SignupError::EmailError(e));
        }

        Ok(())
    }
}
