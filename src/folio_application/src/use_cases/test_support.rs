//! Shared port mocks for the use-case unit tests. Backed by plain mutexed
//! maps; the black-box API tests in folio_auth_service exercise the real
//! adapters instead.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use folio_core::{
    Clock, Credential, Email, EmailClient, EmailClientError, IssuedToken, JwtBlacklistStore,
    JwtBlacklistStoreError, NewUser, Password, PasswordHasher, PasswordHasherError,
    RefreshTokenRecord, RefreshTokenStore, RefreshTokenStoreError, Role, SystemClock, TokenClaims,
    TokenKind, TokenPurpose, TokenSigner, TokenSignerError, User, UserId, UserStatus, UserStore,
    UserStoreError, VerificationTokenRecord, VerificationTokenStore, VerificationTokenStoreError,
};
use secrecy::{ExposeSecret, Secret};

pub fn test_email() -> Email {
    Email::try_from(Secret::from("reader@folio.dev".to_string())).unwrap()
}

pub fn test_password() -> Password {
    Password::try_from(Secret::from("P@ssw0rd1".to_string())).unwrap()
}

pub fn test_user(id: UserId, email_verified: bool, status: UserStatus) -> User {
    User {
        id,
        email: test_email(),
        full_name: "Avid Reader".to_string(),
        credential: Credential::Local {
            password_hash: Secret::from("hashed:P@ssw0rd1".to_string()),
        },
        role: Role::User,
        email_verified,
        status,
    }
}

// MockUserStore

#[derive(Clone, Default)]
pub struct MockUserStore {
    users: Arc<Mutex<HashMap<UserId, User>>>,
    next_id: Arc<Mutex<UserId>>,
}

impl MockUserStore {
    pub fn with_user(user: User) -> Self {
        let store = Self::default();
        store.users.lock().unwrap().insert(user.id, user);
        store
    }

    pub fn get(&self, id: UserId) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn add_user(&self, user: NewUser) -> Result<User, UserStoreError> {
        let mut users = self.users.lock().unwrap();
        if users
            .values()
            .any(|existing| existing.email == user.email)
        {
            return Err(UserStoreError::UserAlreadyExists);
        }
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let user = User {
            id: *next_id,
            email: user.email,
            full_name: user.full_name,
            credential: user.credential,
            role: user.role,
            email_verified: user.email_verified,
            status: user.status,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|user| &user.email == email)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, UserStoreError> {
        self.get(id).ok_or(UserStoreError::UserNotFound)
    }

    async fn email_exists(&self, email: &Email) -> Result<bool, UserStoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|user| &user.email == email))
    }

    async fn set_email_verified(&self, id: UserId) -> Result<(), UserStoreError> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&id).ok_or(UserStoreError::UserNotFound)?;
        user.email_verified = true;
        Ok(())
    }

    async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: Secret<String>,
    ) -> Result<(), UserStoreError> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&id).ok_or(UserStoreError::UserNotFound)?;
        user.credential = Credential::Local { password_hash };
        Ok(())
    }
}

// MockPasswordHasher - "hashes" by prefixing, so verification is a string
// comparison the tests can reason about.

#[derive(Clone, Default)]
pub struct MockPasswordHasher {
    reject_all: bool,
}

impl MockPasswordHasher {
    pub fn rejecting() -> Self {
        Self { reject_all: true }
    }
}

#[async_trait]
impl PasswordHasher for MockPasswordHasher {
    async fn hash(&self, password: Password) -> Result<Secret<String>, PasswordHasherError> {
        Ok(Secret::from(format!(
            "hashed:{}",
            password.as_ref().expose_secret()
        )))
    }

    async fn verify(
        &self,
        candidate: Password,
        expected_hash: Secret<String>,
    ) -> Result<(), PasswordHasherError> {
        if self.reject_all {
            return Err(PasswordHasherError::Mismatch);
        }
        let rehashed = format!("hashed:{}", candidate.as_ref().expose_secret());
        if rehashed == *expected_hash.expose_secret() {
            Ok(())
        } else {
            Err(PasswordHasherError::Mismatch)
        }
    }
}

// MockTokenSigner - deterministic tokens, claims recorded at issue time.

#[derive(Clone)]
pub struct MockTokenSigner {
    issued: Arc<Mutex<HashMap<String, (TokenKind, TokenClaims)>>>,
    counter: Arc<Mutex<u64>>,
}

impl Default for MockTokenSigner {
    fn default() -> Self {
        Self {
            issued: Arc::new(Mutex::new(HashMap::new())),
            counter: Arc::new(Mutex::new(0)),
        }
    }
}

impl TokenSigner for MockTokenSigner {
    fn issue(&self, kind: TokenKind, user_id: UserId) -> Result<IssuedToken, TokenSignerError> {
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;
        let jti = format!("jti-{}", *counter);
        let token = match kind {
            TokenKind::Access => format!("access-{}", *counter),
            TokenKind::Refresh => format!("refresh-{}", *counter),
        };
        let now = SystemClock.now();
        let ttl = match kind {
            TokenKind::Access => Duration::minutes(15),
            TokenKind::Refresh => Duration::days(7),
        };
        let claims = TokenClaims {
            user_id,
            issued_at: now,
            expires_at: now + ttl,
            jti,
        };
        self.issued
            .lock()
            .unwrap()
            .insert(token.clone(), (kind, claims.clone()));
        Ok(IssuedToken { token, claims })
    }

    fn verify(&self, kind: TokenKind, token: &str) -> Result<TokenClaims, TokenSignerError> {
        match self.issued.lock().unwrap().get(token) {
            Some((issued_kind, claims)) if *issued_kind == kind => Ok(claims.clone()),
            Some(_) => Err(TokenSignerError::InvalidSignature),
            None => Err(TokenSignerError::Malformed),
        }
    }
}

// MockRefreshTokenStore - keyed by the raw token for test convenience.

#[derive(Clone, Default)]
pub struct MockRefreshTokenStore {
    records: Arc<Mutex<HashMap<String, RefreshTokenRecord>>>,
}

impl MockRefreshTokenStore {
    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.records
            .lock()
            .unwrap()
            .values()
            .filter(|record| !record.revoked)
            .count()
    }
}

#[async_trait]
impl RefreshTokenStore for MockRefreshTokenStore {
    async fn save(
        &self,
        user_id: UserId,
        raw_token: &str,
        issued_at: chrono::DateTime<Utc>,
        expires_at: chrono::DateTime<Utc>,
    ) -> Result<(), RefreshTokenStoreError> {
        self.records.lock().unwrap().insert(
            raw_token.to_string(),
            RefreshTokenRecord {
                user_id,
                issued_at,
                expires_at,
                revoked: false,
                replaced_by: None,
            },
        );
        Ok(())
    }

    async fn find(&self, raw_token: &str) -> Result<RefreshTokenRecord, RefreshTokenStoreError> {
        self.records
            .lock()
            .unwrap()
            .get(raw_token)
            .cloned()
            .ok_or(RefreshTokenStoreError::TokenNotFound)
    }

    async fn revoke(&self, raw_token: &str) -> Result<(), RefreshTokenStoreError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(raw_token)
            .ok_or(RefreshTokenStoreError::TokenNotFound)?;
        record.revoked = true;
        Ok(())
    }

    async fn rotate(
        &self,
        old_raw_token: &str,
        new_raw_token: &str,
        new_jti: &str,
        user_id: UserId,
        issued_at: chrono::DateTime<Utc>,
        expires_at: chrono::DateTime<Utc>,
    ) -> Result<(), RefreshTokenStoreError> {
        let mut records = self.records.lock().unwrap();
        let old = records
            .get_mut(old_raw_token)
            .ok_or(RefreshTokenStoreError::TokenNotFound)?;
        if old.revoked {
            return Err(RefreshTokenStoreError::AlreadyRotated);
        }
        old.revoked = true;
        old.replaced_by = Some(new_jti.to_string());
        records.insert(
            new_raw_token.to_string(),
            RefreshTokenRecord {
                user_id,
                issued_at,
                expires_at,
                revoked: false,
                replaced_by: None,
            },
        );
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: UserId) -> Result<u64, RefreshTokenStoreError> {
        let mut revoked = 0;
        for record in self.records.lock().unwrap().values_mut() {
            if record.user_id == user_id && !record.revoked {
                record.revoked = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn sweep_expired(&self) -> Result<u64, RefreshTokenStoreError> {
        let now = Utc::now();
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|_, record| record.expires_at >= now);
        Ok((before - records.len()) as u64)
    }
}

// MockJwtBlacklistStore

#[derive(Clone, Default)]
pub struct MockJwtBlacklistStore {
    entries: Arc<Mutex<HashMap<String, chrono::DateTime<Utc>>>>,
}

#[async_trait]
impl JwtBlacklistStore for MockJwtBlacklistStore {
    async fn add(
        &self,
        _user_id: UserId,
        jti: &str,
        expires_at: chrono::DateTime<Utc>,
    ) -> Result<(), JwtBlacklistStoreError> {
        self.entries
            .lock()
            .unwrap()
            .insert(jti.to_string(), expires_at);
        Ok(())
    }

    async fn contains(&self, jti: &str) -> Result<bool, JwtBlacklistStoreError> {
        Ok(self.entries.lock().unwrap().contains_key(jti))
    }

    async fn sweep_expired(&self) -> Result<u64, JwtBlacklistStoreError> {
        let now = Utc::now();
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at >= now);
        Ok((before - entries.len()) as u64)
    }
}

// MockVerificationTokenStore

#[derive(Clone, Default)]
pub struct MockVerificationTokenStore {
    records: Arc<Mutex<HashMap<String, VerificationTokenRecord>>>,
    counter: Arc<Mutex<i64>>,
}

impl MockVerificationTokenStore {
    pub fn expire_all(&self) {
        let past = Utc::now() - Duration::hours(2);
        for record in self.records.lock().unwrap().values_mut() {
            record.expires_at = past;
        }
    }

    pub fn outstanding(&self, user_id: UserId, purpose: TokenPurpose) -> usize {
        self.records
            .lock()
            .unwrap()
            .values()
            .filter(|record| record.user_id == user_id && record.purpose == purpose)
            .count()
    }
}

#[async_trait]
impl VerificationTokenStore for MockVerificationTokenStore {
    async fn issue(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
        pending_email: Option<String>,
    ) -> Result<String, VerificationTokenStoreError> {
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;
        let raw = format!("vt-{}", *counter);
        let now = Utc::now();
        self.records.lock().unwrap().insert(
            raw.clone(),
            VerificationTokenRecord {
                id: *counter,
                user_id,
                purpose,
                pending_email,
                created_at: now,
                expires_at: now + Duration::hours(1),
                used: false,
                used_at: None,
            },
        );
        Ok(raw)
    }

    async fn redeem(
        &self,
        raw_token: &str,
        expected_purpose: TokenPurpose,
    ) -> Result<VerificationTokenRecord, VerificationTokenStoreError> {
        let records = self.records.lock().unwrap();
        let record = records
            .get(raw_token)
            .ok_or(VerificationTokenStoreError::TokenNotFound)?;
        if record.purpose != expected_purpose {
            return Err(VerificationTokenStoreError::PurposeMismatch);
        }
        if Utc::now() > record.expires_at {
            return Err(VerificationTokenStoreError::Expired);
        }
        if record.used {
            return Err(VerificationTokenStoreError::AlreadyUsed);
        }
        Ok(record.clone())
    }

    async fn mark_used(&self, token_id: i64) -> Result<(), VerificationTokenStoreError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .values_mut()
            .find(|record| record.id == token_id)
            .ok_or(VerificationTokenStoreError::TokenNotFound)?;
        if record.used {
            return Err(VerificationTokenStoreError::AlreadyUsed);
        }
        record.used = true;
        record.used_at = Some(Utc::now());
        Ok(())
    }

    async fn invalidate_all_for_purpose(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
    ) -> Result<u64, VerificationTokenStoreError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|_, record| !(record.user_id == user_id && record.purpose == purpose));
        Ok((before - records.len()) as u64)
    }

    async fn sweep_expired(&self) -> Result<u64, VerificationTokenStoreError> {
        let now = Utc::now();
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|_, record| record.expires_at >= now);
        Ok((before - records.len()) as u64)
    }
}

// MockEmailClient - records every dispatched link so tests can fish the raw
// token back out.

#[derive(Clone)]
pub struct SentLink {
    pub purpose: TokenPurpose,
    pub raw_token: String,
}

#[derive(Clone, Default)]
pub struct MockEmailClient {
    sent: Arc<Mutex<Vec<SentLink>>>,
    fail_all: bool,
}

impl MockEmailClient {
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_all: true,
        }
    }

    pub fn sent(&self) -> Vec<SentLink> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailClient for MockEmailClient {
    async fn send_verification_link(
        &self,
        _recipient: &Email,
        purpose: TokenPurpose,
        raw_token: &str,
    ) -> Result<(), EmailClientError> {
        if self.fail_all {
            return Err(EmailClientError::DeliveryError(
                "smtp unreachable".to_string(),
            ));
        }
        self.sent.lock().unwrap().push(SentLink {
            purpose,
            raw_token: raw_token.to_string(),
        });
        Ok(())
    }
}
