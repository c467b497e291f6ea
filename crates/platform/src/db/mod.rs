//! Database operations for the platform `PostgreSQL` instance.
//!
//! # Tables
//!
//! - `stores` - Merchant storefronts (theme, business settings, domain columns)
//! - `plans` - Admin-managed subscription tiers
//! - `subscriptions` - Store↔plan links, historical rows per store
//! - `invoices` - Manually reviewed payment references
//! - `categories` / `products` / `orders` - Store-scoped catalog
//! - `domain_check_log` - Audit rows from the scheduled domain sweep
//!
//! # Migrations
//!
//! Migrations are stored in `crates/platform/migrations/` and run via:
//! ```bash
//! cargo run -p storelane-cli -- migrate
//! ```
//!
//! All queries use the sqlx runtime API (`query` / `query_as` with `FromRow`)
//! so the workspace builds without a reachable database.

pub mod audit;
pub mod catalog;
pub mod invoices;
pub mod orders;
pub mod plans;
pub mod stores;
pub mod subscriptions;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
