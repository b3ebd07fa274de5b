use folio_core::{
    Credential, Email, NewUser, Role, User, UserId, UserStatus, UserStore, UserStoreError,
};
use secrecy::{ExposeSecret, Secret};
use sqlx::{FromRow, PgPool, Pool, Postgres, Row};

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresUserStore { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i32,
    email: String,
    full_name: String,
    password_hash: Option<String>,
    provider: Option<String>,
    role: String,
    email_verified: bool,
    status: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, UserStoreError> {
        let email = Email::try_from(Secret::from(self.email))
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        let credential = match (self.password_hash, self.provider) {
            (Some(hash), _) => Credential::Local {
                password_hash: Secret::from(hash),
            },
            (None, Some(provider)) => Credential::Social { provider },
            (None, None) => {
                return Err(UserStoreError::UnexpectedError(
                    "user row has neither password hash nor provider".to_string(),
                ));
            }
        };

        let role = Role::parse(&self.role)
            .ok_or_else(|| UserStoreError::UnexpectedError(format!("unknown role {}", self.role)))?;
        let status = UserStatus::parse(&self.status).ok_or_else(|| {
            UserStoreError::UnexpectedError(format!("unknown status {}", self.status))
        })?;

        Ok(User {
            id: self.id,
            email,
            full_name: self.full_name,
            credential,
            role,
            email_verified: self.email_verified,
            status,
        })
    }
}

const USER_COLUMNS: &str =
    "id, email, full_name, password_hash, provider, role, email_verified, status";

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&self, user: NewUser) -> Result<User, UserStoreError> {
        let (password_hash, provider) = match &user.credential {
            Credential::Local { password_hash } => {
                (Some(password_hash.expose_secret().clone()), None)
            }
            Credential::Social { provider } => (None, Some(provider.clone())),
        };

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
                INSERT INTO users (email, full_name, password_hash, provider, role, email_verified, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.email.as_ref().expose_secret())
        .bind(&user.full_name)
        .bind(password_hash)
        .bind(provider)
        .bind(user.role.as_str())
        .bind(user.email_verified)
        .bind(user.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.constraint().is_some() {
                    return UserStoreError::UserAlreadyExists;
                }
            }
            UserStoreError::UnexpectedError(e.to_string())
        })?;

        row.into_user()
    }

    #[tracing::instrument(name = "Retrieving user by email from PostgreSQL", skip_all)]
    async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_ref().expose_secret())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        row.ok_or(UserStoreError::UserNotFound)?.into_user()
    }

    #[tracing::instrument(name = "Retrieving user by id from PostgreSQL", skip_all)]
    async fn find_by_id(&self, id: UserId) -> Result<User, UserStoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        row.ok_or(UserStoreError::UserNotFound)?.into_user()
    }

    #[tracing::instrument(name = "Checking email existence in PostgreSQL", skip_all)]
    async fn email_exists(&self, email: &Email) -> Result<bool, UserStoreError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1) AS present")
            .bind(email.as_ref().expose_secret())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        row.try_get("present")
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))
    }

    #[tracing::instrument(name = "Marking email verified in PostgreSQL", skip_all)]
    async fn set_email_verified(&self, id: UserId) -> Result<(), UserStoreError> {
        let result = sqlx::query("UPDATE users SET email_verified = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Setting password hash in PostgreSQL", skip_all)]
    async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: Secret<String>,
    ) -> Result<(), UserStoreError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $1, provider = NULL WHERE id = $2")
                .bind(password_hash.expose_secret())
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }
        Ok(())
    }
}
