use folio_core::{
    Credential, Email, Password, PasswordHasher, PasswordHasherError, RefreshTokenStore,
    RefreshTokenStoreError, Role, TokenKind, TokenSigner, TokenSignerError, UserStore,
    UserStoreError, UserStatus,
};

/// A freshly issued access/refresh pair together with the response metadata
/// the HTTP layer needs.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in_ms: i64,
    pub email: Email,
    pub role: Role,
}

/// Error types specific to login use case. Credential-related variants are
/// collapsed into one generic message at the HTTP boundary; they stay
/// distinguishable here for logging.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Please verify your email before logging in")]
    EmailNotVerified,
    #[error("Account is locked")]
    AccountLocked,
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
    #[error("Password hasher error: {0}")]
    PasswordHasherError(PasswordHasherError),
    #[error("Token signer error: {0}")]
    TokenSignerError(#[from] TokenSignerError),
    #[error("Refresh token store error: {0}")]
    RefreshTokenStoreError(#[from] RefreshTokenStoreError),
}

/// Login use case - authenticates credentials and issues a token pair
pub struct LoginUseCase<U, P, S, R>
where
    U: UserStore,
    P: PasswordHasher,
    S: TokenSigner,
    R: RefreshTokenStore,
{
    user_store: U,
    password_hasher: P,
    token_signer: S,
    refresh_token_store: R,
}

impl<U, P, S, R> LoginUseCase<U, P, S, R>
where
    U: UserStore,
    P: PasswordHasher,
    S: TokenSigner,
    R: RefreshTokenStore,
{
    pub fn new(
        user_store: U,
        password_hasher: P,
        token_signer: S,
        refresh_token_store: R,
    ) -> Self {
        Self {
            user_store,
            password_hasher,
            token_signer,
            refresh_token_store,
        }
    }

    /// Execute the login use case.
    ///
    /// All three gates (known email, verified email, account not locked)
    /// plus the password check must pass before any token is issued.
    #[tracing::instrument(name = "LoginUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        email: Email,
        password: Password,
    ) -> Result<AuthenticatedSession, LoginError> {
        let user = self
            .user_store
            .find_by_email(&email)
            .await
            .map_err(|e| match e {
                UserStoreError::UserNotFound => LoginError::InvalidCredentials,
                e => LoginError::UserStoreError(e),
            })?;

        if !user.email_verified {
            return Err(LoginError::EmailNotVerified);
        }

        if user.status == UserStatus::Locked {
            return Err(LoginError::AccountLocked);
        }

        // Social-only accounts have no local password to check against.
        let Credential::Local { password_hash } = &user.credential else {
            return Err(LoginError::InvalidCredentials);
        };

        self.password_hasher
            .verify(password, password_hash.clone())
            .await
            .map_err(|e| match e {
                PasswordHasherError::Mismatch => LoginError::InvalidCredentials,
                e => LoginError::PasswordHasherError(e),
            })?;

        let access = self.token_signer.issue(TokenKind::Access, user.id)?;
        let refresh = self.token_signer.issue(TokenKind::Refresh, user.id)?;

        self.refresh_token_store
            .save(
                user.id,
                &refresh.token,
                refresh.claims.issued_at,
                refresh.claims.expires_at,
            )
            .await?;

        Ok(AuthenticatedSession {
            access_token: access.token,
            refresh_token: refresh.token,
            expires_in_ms: (access.claims.expires_at - access.claims.issued_at).num_milliseconds(),
            email: user.email,
            role: user.role,
        })
    }
}
