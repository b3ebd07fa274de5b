use std::sync::atomic::{AtomicI32, Ordering};

use dashmap::DashMap;
use folio_core::{Credential, Email, NewUser, User, UserId, UserStore, UserStoreError};
use secrecy::{ExposeSecret, Secret};

/// In-memory user store for tests and local development.
#[derive(Default)]
pub struct MemUserStore {
    users: DashMap<UserId, User>,
    ids_by_email: DashMap<String, UserId>,
    next_id: AtomicI32,
}

impl MemUserStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            ids_by_email: DashMap::new(),
            next_id: AtomicI32::new(1),
        }
    }
}

#[async_trait::async_trait]
impl UserStore for MemUserStore {
    async fn add_user(&self, user: NewUser) -> Result<User, UserStoreError> {
        let email_key = user.email.as_ref().expose_secret().clone();
        if self.ids_by_email.contains_key(&email_key) {
            return Err(UserStoreError::UserAlreadyExists);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = User {
            id,
            email: user.email,
            full_name: user.full_name,
            credential: user.credential,
            role: user.role,
            email_verified: user.email_verified,
            status: user.status,
        };
        self.users.insert(id, stored.clone());
        self.ids_by_email.insert(email_key, id);
        Ok(stored)
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        let id = self
            .ids_by_email
            .get(email.as_ref().expose_secret())
            .map(|entry| *entry)
            .ok_or(UserStoreError::UserNotFound)?;
        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, UserStoreError> {
        self.users
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn email_exists(&self, email: &Email) -> Result<bool, UserStoreError> {
        Ok(self.ids_by_email.contains_key(email.as_ref().expose_secret()))
    }

    async fn set_email_verified(&self, id: UserId) -> Result<(), UserStoreError> {
        let mut user = self.users.get_mut(&id).ok_or(UserStoreError::UserNotFound)?;
        user.email_verified = true;
        Ok(())
    }

    async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: Secret<String>,
    ) -> Result<(), UserStoreError> {
        let mut user = self.users.get_mut(&id).ok_or(UserStoreError::UserNotFound)?;
        user.credential = Credential::Local { password_hash };
        Ok(())
    }
}
