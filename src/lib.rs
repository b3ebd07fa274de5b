//! Folio authentication - token lifecycle backend for the folio workspace
//! management service.
//!
//! Re-exports the public surface of the member crates so downstream callers
//! only need a single dependency.

pub use folio_adapters as adapters;
pub use folio_application as application;
pub use folio_auth_service::AuthService;
pub use folio_core as core;

// Commonly used domain and port types
pub use folio_core::{
    Clock, Credential, Email, EmailClient, JwtBlacklistStore, Password, PasswordHasher,
    RefreshTokenStore, Role, SystemClock, TokenKind, TokenPurpose, TokenSigner, User, UserStore,
    VerificationTokenStore,
};

// Commonly used adapters
pub use folio_adapters::{
    auth::{Argon2PasswordHasher, JwtTokenSigner},
    email::PostmarkEmailClient,
    persistence::{
        PostgresJwtBlacklistStore, PostgresRefreshTokenStore, PostgresUserStore,
        PostgresVerificationTokenStore,
    },
};

// Re-export key third-party types that appear in the public API
pub use secrecy::{ExposeSecret, Secret};
