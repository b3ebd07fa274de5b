use std::sync::LazyLock;

use axum::http::HeaderValue;
use secrecy::Secret;
use serde::Deserialize;

/// CORS origin allowlist parsed from the comma-separated settings value.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins(Vec<HeaderValue>);

impl AllowedOrigins {
    pub fn parse(raw: &str) -> Self {
        let origins = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        Self(origins)
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.contains(origin)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Process-wide settings, loaded once. Every key has a development default
/// so the service and its tests come up without any environment at all;
/// production overrides them through `FOLIO__`-prefixed variables
/// (for example `FOLIO__AUTH__JWT__ACCESS_SECRET`).
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub email: EmailSettings,
}

#[derive(Debug, Deserialize)]
pub struct AppSettings {
    pub address: String,
    /// Base URL that verification links in outbound emails point at.
    pub public_base_url: String,
    /// Comma-separated list of origins allowed by CORS.
    pub allowed_origins: String,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub url: Secret<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    pub jwt: JwtSettings,
    pub verification: VerificationSettings,
}

#[derive(Debug, Deserialize)]
pub struct JwtSettings {
    pub access_secret: Secret<String>,
    pub refresh_secret: Secret<String>,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
    pub refresh_cookie_name: String,
}

#[derive(Debug, Deserialize)]
pub struct VerificationSettings {
    pub verify_email_ttl_seconds: i64,
    pub change_email_ttl_seconds: i64,
    pub reset_password_ttl_seconds: i64,
}

#[derive(Debug, Deserialize)]
pub struct EmailSettings {
    pub base_url: String,
    pub sender: String,
    pub auth_token: Secret<String>,
    pub timeout_ms: u64,
}

impl Settings {
    pub fn load() -> &'static Settings {
        static SETTINGS: LazyLock<Settings> = LazyLock::new(|| {
            dotenvy::dotenv().ok();
            Settings::build().expect("Failed to load settings")
        });
        &SETTINGS
    }

    fn build() -> Result<Settings, config::ConfigError> {
        config::Config::builder()
            .set_default("app.address", super::constants::prod::APP_ADDRESS)?
            .set_default("app.public_base_url", "http://localhost:3000")?
            .set_default("app.allowed_origins", "http://localhost:5173")?
            .set_default("database.url", "postgres://postgres@localhost:5432/folio")?
            .set_default("auth.jwt.access_secret", "dev-only-access-secret")?
            .set_default("auth.jwt.refresh_secret", "dev-only-refresh-secret")?
            .set_default("auth.jwt.access_ttl_seconds", 900)?
            .set_default("auth.jwt.refresh_ttl_seconds", 604_800)?
            .set_default("auth.jwt.refresh_cookie_name", "folio_refresh")?
            .set_default("auth.verification.verify_email_ttl_seconds", 86_400)?
            .set_default("auth.verification.change_email_ttl_seconds", 86_400)?
            .set_default("auth.verification.reset_password_ttl_seconds", 3_600)?
            .set_default(
                "email.base_url",
                super::constants::prod::email_client::BASE_URL,
            )?
            .set_default("email.sender", "no-reply@folio.dev")?
            .set_default("email.auth_token", "")?
            .set_default("email.timeout_ms", 10_000)?
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?
            .try_deserialize()
    }
}
