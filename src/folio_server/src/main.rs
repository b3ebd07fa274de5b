use std::{sync::Arc, time::Duration};

use folio_adapters::{
    Argon2PasswordHasher, JwtSignerConfig, JwtTokenSigner, PostgresJwtBlacklistStore,
    PostgresRefreshTokenStore, PostgresUserStore, PostgresVerificationTokenStore,
    PostmarkEmailClient, VerificationTtls,
    config::{AllowedOrigins, Settings},
};
use folio_auth_service::{AuthService, get_postgres_pool, init_tracing, spawn_expiry_sweeper};
use folio_core::{Clock, Email, SystemClock};
use reqwest::Client as HttpClient;
use secrecy::{ExposeSecret, Secret};

/// How often expired rows are deleted from the token tables.
const SWEEP_PERIOD: Duration = Duration::from_secs(3_600);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    color_eyre::install().expect("Failed to install color_eyre");
    init_tracing().expect("Failed to initialize tracing");

    let settings = Settings::load();

    // Setup database connection pool and bring the schema up to date
    let pg_pool = get_postgres_pool(settings.database.url.expose_secret()).await?;
    sqlx::migrate!().run(&pg_pool).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Create stores
    let user_store = Arc::new(PostgresUserStore::new(pg_pool.clone()));
    let refresh_token_store = Arc::new(PostgresRefreshTokenStore::new(pg_pool.clone()));
    let jwt_blacklist = Arc::new(PostgresJwtBlacklistStore::new(pg_pool.clone()));
    let verification_tokens = Arc::new(PostgresVerificationTokenStore::new(
        pg_pool,
        VerificationTtls::from_settings(&settings.auth.verification),
        clock.clone(),
    ));

    let token_signer = JwtTokenSigner::new(
        JwtSignerConfig {
            access_secret: settings.auth.jwt.access_secret.clone(),
            refresh_secret: settings.auth.jwt.refresh_secret.clone(),
            access_ttl_seconds: settings.auth.jwt.access_ttl_seconds,
            refresh_ttl_seconds: settings.auth.jwt.refresh_ttl_seconds,
        },
        clock.clone(),
    );

    // Create email client
    let http_client = HttpClient::builder()
        .timeout(Duration::from_millis(settings.email.timeout_ms))
        .build()?;

    let email_client = Arc::new(PostmarkEmailClient::new(
        settings.email.base_url.clone(),
        Email::try_from(Secret::new(settings.email.sender.clone()))?,
        settings.email.auth_token.clone(),
        settings.app.public_base_url.clone(),
        http_client,
    ));

    spawn_expiry_sweeper(
        refresh_token_store.clone(),
        jwt_blacklist.clone(),
        verification_tokens.clone(),
        SWEEP_PERIOD,
    );

    let auth_service = AuthService::new(
        user_store,
        Argon2PasswordHasher,
        token_signer,
        verification_tokens,
        refresh_token_store,
        jwt_blacklist,
        email_client,
        clock,
    );

    let allowed_origins = AllowedOrigins::parse(&settings.app.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&settings.app.address).await?;
    tracing::info!("Starting auth service...");

    auth_service
        .run_standalone(listener, Some(allowed_origins))
        .await?;

    Ok(())
}
