pub mod error;
pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod resend_verification;
pub mod reset_password;
pub mod signup;
pub mod verify_email;
pub mod verify_token;

pub use error::AuthApiError;
pub use forgot_password::{ForgotPasswordRequest, forgot_password};
pub use login::{JwtResponse, LoginRequest, login};
pub use logout::{LogoutRequest, logout};
pub use refresh::{RefreshRequest, refresh};
pub use resend_verification::{ResendVerificationRequest, resend_verification};
pub use reset_password::{ResetPasswordRequest, reset_password};
pub use signup::{SignupRequest, signup};
pub use verify_email::{VerifyEmailQuery, verify_email};
pub use verify_token::{VerifyTokenRequest, verify_token};

use axum::http::{HeaderMap, header};

/// Pulls the bearer token out of the Authorization header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthApiError::MissingToken)
}
