pub mod mem_jwt_blacklist_store;
pub mod mem_refresh_token_store;
pub mod mem_user_store;
pub mod mem_verification_token_store;
pub mod postgres_jwt_blacklist_store;
pub mod postgres_refresh_token_store;
pub mod postgres_user_store;
pub mod postgres_verification_token_store;

pub use mem_jwt_blacklist_store::MemJwtBlacklistStore;
pub use mem_refresh_token_store::MemRefreshTokenStore;
pub use mem_user_store::MemUserStore;
pub use mem_verification_token_store::MemVerificationTokenStore;
pub use postgres_jwt_blacklist_store::PostgresJwtBlacklistStore;
pub use postgres_refresh_token_store::PostgresRefreshTokenStore;
pub use postgres_user_store::PostgresUserStore;
pub use postgres_verification_token_store::PostgresVerificationTokenStore;

use chrono::Duration;
use folio_core::TokenPurpose;
use rand::{Rng, distr::Alphanumeric};

use crate::config::settings::VerificationSettings;

/// Per-purpose lifetimes for single-use verification tokens.
#[derive(Debug, Clone, Copy)]
pub struct VerificationTtls {
    pub verify_email: Duration,
    pub change_email: Duration,
    pub reset_password: Duration,
}

impl VerificationTtls {
    pub fn from_settings(settings: &VerificationSettings) -> Self {
        Self {
            verify_email: Duration::seconds(settings.verify_email_ttl_seconds),
            change_email: Duration::seconds(settings.change_email_ttl_seconds),
            reset_password: Duration::seconds(settings.reset_password_ttl_seconds),
        }
    }

    pub fn for_purpose(&self, purpose: TokenPurpose) -> Duration {
        match purpose {
            TokenPurpose::VerifyEmail => self.verify_email,
            TokenPurpose::ChangeEmail => self.change_email,
            TokenPurpose::ResetPassword => self.reset_password,
        }
    }
}

const RAW_TOKEN_LENGTH: usize = 48;

/// Opaque random token handed to the user; only its digest is persisted.
pub(crate) fn generate_raw_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RAW_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
