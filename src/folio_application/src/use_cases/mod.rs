pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod resend_verification;
pub mod reset_password;
pub mod signup;
pub mod verify_email;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export for convenience
pub use forgot_password::{ForgotPasswordError, ForgotPasswordUseCase};
pub use login::{AuthenticatedSession, LoginError, LoginUseCase};
pub use logout::{LogoutError, LogoutUseCase};
pub use refresh::{RefreshError, RefreshUseCase};
pub use resend_verification::{ResendVerificationError, ResendVerificationUseCase};
pub use reset_password::{ResetPasswordError, ResetPasswordUseCase};
pub use signup::{SignupError, SignupUseCase};
pub use verify_email::{VerifyEmailError, VerifyEmailUseCase};
