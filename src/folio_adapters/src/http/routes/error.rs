use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_application::{
    ForgotPasswordError, LoginError, LogoutError, RefreshError, ResendVerificationError,
    ResetPasswordError, SignupError, VerifyEmailError,
};
use folio_core::{
    EmailError, JwtBlacklistStoreError, PasswordError, RefreshTokenStoreError, UserStoreError,
    VerificationTokenStoreError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AccessTokenError;

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing token")]
    MissingToken,

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("{0}")]
    VerificationTokenError(String),

    #[error("There was an error sending the email. Try again later!")]
    EmailDeliveryError,

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AuthApiError::InvalidInput(_)
            | AuthApiError::MissingToken
            | AuthApiError::VerificationTokenError(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            AuthApiError::EmailAlreadyRegistered => (StatusCode::CONFLICT, self.to_string()),

            AuthApiError::AuthenticationError(_) => (StatusCode::UNAUTHORIZED, self.to_string()),

            AuthApiError::EmailDeliveryError | AuthApiError::UnexpectedError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status_code, body).into_response()
    }
}

impl From<EmailError> for AuthApiError {
    fn from(error: EmailError) -> Self {
        AuthApiError::InvalidInput(error.to_string())
    }
}

impl From<PasswordError> for AuthApiError {
    fn from(error: PasswordError) -> Self {
        AuthApiError::InvalidInput(error.to_string())
    }
}

impl From<AccessTokenError> for AuthApiError {
    fn from(error: AccessTokenError) -> Self {
        match error {
            AccessTokenError::Signer(_) | AccessTokenError::Blacklisted => {
                AuthApiError::AuthenticationError(error.to_string())
            }
            AccessTokenError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<SignupError> for AuthApiError {
    fn from(error: SignupError) -> Self {
        match error {
            SignupError::EmailAlreadyRegistered => AuthApiError::EmailAlreadyRegistered,
            SignupError::EmailError(_) => AuthApiError::EmailDeliveryError,
            SignupError::UserStoreError(UserStoreError::UserAlreadyExists) => {
                AuthApiError::EmailAlreadyRegistered
            }
            SignupError::UserStoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
            SignupError::PasswordHasherError(e) => AuthApiError::UnexpectedError(e.to_string()),
            SignupError::VerificationTokenStoreError(e) => {
                AuthApiError::UnexpectedError(e.to_string())
            }
        }
    }
}

impl From<LoginError> for AuthApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::InvalidCredentials => {
                AuthApiError::AuthenticationError("Invalid email or password".to_string())
            }
            LoginError::EmailNotVerified | LoginError::AccountLocked => {
                AuthApiError::AuthenticationError(error.to_string())
            }
            LoginError::UserStoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
            LoginError::PasswordHasherError(e) => AuthApiError::UnexpectedError(e.to_string()),
            LoginError::TokenSignerError(e) => AuthApiError::UnexpectedError(e.to_string()),
            LoginError::RefreshTokenStoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<LogoutError> for AuthApiError {
    fn from(error: LogoutError) -> Self {
        match error {
            LogoutError::InvalidAccessToken | LogoutError::RefreshTokenNotFound => {
                AuthApiError::AuthenticationError(error.to_string())
            }
            LogoutError::JwtBlacklistStoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
            LogoutError::RefreshTokenStoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<RefreshError> for AuthApiError {
    fn from(error: RefreshError) -> Self {
        match error {
            RefreshError::InvalidToken
            | RefreshError::TokenRevoked
            | RefreshError::TokenExpired
            | RefreshError::UserNotFound => AuthApiError::AuthenticationError(error.to_string()),
            RefreshError::TokenSignerError(e) => AuthApiError::UnexpectedError(e.to_string()),
            RefreshError::RefreshTokenStoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
            RefreshError::UserStoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<VerifyEmailError> for AuthApiError {
    fn from(error: VerifyEmailError) -> Self {
        match error {
            VerifyEmailError::VerificationTokenStoreError(e) => e.into(),
            VerifyEmailError::UserStoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<ForgotPasswordError> for AuthApiError {
    fn from(error: ForgotPasswordError) -> Self {
        match error {
            ForgotPasswordError::EmailError(_) => AuthApiError::EmailDeliveryError,
            ForgotPasswordError::UserStoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
            ForgotPasswordError::VerificationTokenStoreError(e) => {
                AuthApiError::UnexpectedError(e.to_string())
            }
        }
    }
}

impl From<ResetPasswordError> for AuthApiError {
    fn from(error: ResetPasswordError) -> Self {
        match error {
            ResetPasswordError::VerificationTokenStoreError(e) => e.into(),
            ResetPasswordError::UserStoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
            ResetPasswordError::PasswordHasherError(e) => {
                AuthApiError::UnexpectedError(e.to_string())
            }
            ResetPasswordError::RefreshTokenStoreError(e) => {
                AuthApiError::UnexpectedError(e.to_string())
            }
        }
    }
}

impl From<ResendVerificationError> for AuthApiError {
    fn from(error: ResendVerificationError) -> Self {
        match error {
            ResendVerificationError::EmailError(_) => AuthApiError::EmailDeliveryError,
            ResendVerificationError::UserStoreError(e) => {
                AuthApiError::UnexpectedError(e.to_string())
            }
            ResendVerificationError::VerificationTokenStoreError(e) => {
                AuthApiError::UnexpectedError(e.to_string())
            }
        }
    }
}

impl From<VerificationTokenStoreError> for AuthApiError {
    fn from(error: VerificationTokenStoreError) -> Self {
        match error {
            VerificationTokenStoreError::TokenNotFound
            | VerificationTokenStoreError::PurposeMismatch
            | VerificationTokenStoreError::AlreadyUsed
            | VerificationTokenStoreError::Expired => {
                AuthApiError::VerificationTokenError(error.to_string())
            }
            VerificationTokenStoreError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<UserStoreError> for AuthApiError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::UserAlreadyExists => AuthApiError::EmailAlreadyRegistered,
            UserStoreError::UserNotFound => {
                AuthApiError::AuthenticationError(error.to_string())
            }
            UserStoreError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<JwtBlacklistStoreError> for AuthApiError {
    fn from(error: JwtBlacklistStoreError) -> Self {
        AuthApiError::UnexpectedError(error.to_string())
    }
}

impl From<RefreshTokenStoreError> for AuthApiError {
    fn from(error: RefreshTokenStoreError) -> Self {
        AuthApiError::UnexpectedError(error.to_string())
    }
}
