pub mod use_cases;

pub use use_cases::{
    forgot_password::{ForgotPasswordError, ForgotPasswordUseCase},
    login::{AuthenticatedSession, LoginError, LoginUseCase},
    logout::{LogoutError, LogoutUseCase},
    refresh::{RefreshError, RefreshUseCase},
    resend_verification::{ResendVerificationError, ResendVerificationUseCase},
    reset_password::{ResetPasswordError, ResetPasswordUseCase},
    signup::{SignupError, SignupUseCase},
    verify_email::{VerifyEmailError, VerifyEmailUseCase},
};
