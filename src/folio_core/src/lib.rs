pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    email::{Email, EmailError},
    password::{Password, PasswordError},
    token::{TokenKind, TokenPurpose},
    user::{Capability, Credential, NewUser, Role, User, UserId, UserStatus},
};

pub use ports::{
    repositories::{
        JwtBlacklistStore, JwtBlacklistStoreError, RefreshTokenRecord, RefreshTokenStore,
        RefreshTokenStoreError, UserStore, UserStoreError, VerificationTokenRecord,
        VerificationTokenStore, VerificationTokenStoreError,
    },
    services::{
        Clock, EmailClient, EmailClientError, IssuedToken, ManualClock, PasswordHasher,
        PasswordHasherError, SystemClock, TokenClaims, TokenSigner, TokenSignerError,
    },
};
