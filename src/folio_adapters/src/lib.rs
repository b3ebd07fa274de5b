pub mod auth;
pub mod config;
pub mod email;
pub mod http;
pub mod persistence;

pub use auth::{
    Argon2PasswordHasher, JwtSignerConfig, JwtTokenSigner, token_digest, validate_access_token,
};
pub use email::{MockEmailClient, PostmarkEmailClient};
pub use persistence::{
    MemJwtBlacklistStore, MemRefreshTokenStore, MemUserStore, MemVerificationTokenStore,
    PostgresJwtBlacklistStore, PostgresRefreshTokenStore, PostgresUserStore,
    PostgresVerificationTokenStore, VerificationTtls,
};
