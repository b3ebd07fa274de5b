use secrecy::Secret;

use crate::domain::email::Email;

pub type UserId = i32;

/// Enumerated role with explicit capability checks. Authorization decisions
/// go through `Role::allows`, never through string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Librarian,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    BorrowItems,
    ManageCatalog,
    ManageUsers,
}

impl Role {
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::BorrowItems => true,
            Capability::ManageCatalog => matches!(self, Role::Librarian | Role::Admin),
            Capability::ManageUsers => matches!(self, Role::Admin),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Librarian => "LIBRARIAN",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "USER" => Some(Role::User),
            "LIBRARIAN" => Some(Role::Librarian),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Locked,
    Pending,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Locked => "LOCKED",
            UserStatus::Pending => "PENDING",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(UserStatus::Active),
            "LOCKED" => Some(UserStatus::Locked),
            "PENDING" => Some(UserStatus::Pending),
            _ => None,
        }
    }
}

/// How the account authenticates. Social-login accounts carry no local
/// password hash at all, so the variant makes "no password" unrepresentable
/// as an empty string.
#[derive(Debug, Clone)]
pub enum Credential {
    Local { password_hash: Secret<String> },
    Social { provider: String },
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub full_name: String,
    pub credential: Credential,
    pub role: Role,
    pub email_verified: bool,
    pub status: UserStatus,
}

impl User {
    pub fn password_hash(&self) -> Option<&Secret<String>> {
        match &self.credential {
            Credential::Local { password_hash } => Some(password_hash),
            Credential::Social { .. } => None,
        }
    }
}

/// Insertion form of a user; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub full_name: String,
    pub credential: Credential,
    pub role: Role,
    pub email_verified: bool,
    pub status: UserStatus,
}
