use crate::core::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Connect the Postgres pool used by every service
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    tracing::info!(
        "Connecting to database {} (max_connections={}, min_connections={})",
        redact_credentials(&config.url),
        config.max_connections,
        config.min_connections
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
}

/// Apply the embedded schema migrations (also seeds the branch lookup table)
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Host/database part of a connection URL, without user and password
fn redact_credentials(url: &str) -> &str {
    url.rsplit_once('@').map(|(_, host)| host).unwrap_or("***")
}
