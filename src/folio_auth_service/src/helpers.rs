use folio_adapters::config::Settings;
use secrecy::ExposeSecret;
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Connection pool against the configured database.
///
/// # Panics
/// Panics if the pool cannot be created. Migrations are run by the server
/// binary, which owns the migrations directory.
pub async fn configure_postgresql() -> PgPool {
    let config = Settings::load();
    let db_url = config.database.url.expose_secret();

    get_postgres_pool(db_url)
        .await
        .expect("Failed to create Postgres connection pool")
}

pub async fn get_postgres_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(5).connect(url).await
}
