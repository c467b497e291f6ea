//! Database migration command.
//!
//! Migrations live in `crates/platform/migrations/` and are embedded at
//! compile time, so the binary can migrate without a source checkout.

use super::CommandError;

/// Run pending platform migrations.
///
/// # Errors
///
/// Returns an error when the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running platform migrations...");
    sqlx::migrate!("../platform/migrations").run(&pool).await?;

    tracing::info!("Platform migrations complete");
    Ok(())
}
