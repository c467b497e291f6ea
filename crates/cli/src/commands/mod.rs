//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod store;

use secrecy::SecretString;
use sqlx::PgPool;

/// Errors shared by all commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Aborted(String),
}

/// Connect to the platform database from the environment.
///
/// Reads `PLATFORM_DATABASE_URL`, falling back to `DATABASE_URL`.
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let url = std::env::var("PLATFORM_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("PLATFORM_DATABASE_URL"))?;

    Ok(storelane_platform::db::create_pool(&url).await?)
}
