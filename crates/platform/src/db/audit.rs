//! Audit log for the scheduled domain-status sweep.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storelane_core::StoreId;

use super::RepositoryError;

/// One sweep result for one store.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct DomainCheck {
    pub id: i32,
    pub store_id: StoreId,
    pub domain: String,
    pub ok: bool,
    pub verified: Option<bool>,
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

/// Append one audit row for a sweep result.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn record_domain_check(
    pool: &PgPool,
    store_id: StoreId,
    domain: &str,
    ok: bool,
    verified: Option<bool>,
    error: Option<&str>,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO domain_check_log (store_id, domain, ok, verified, error)
        VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(store_id)
    .bind(domain)
    .bind(ok)
    .bind(verified)
    .bind(error)
    .execute(pool)
    .await?;

    Ok(())
}

/// Recent sweep history for a store.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn recent_checks(
    pool: &PgPool,
    store_id: StoreId,
    limit: i64,
) -> Result<Vec<DomainCheck>, RepositoryError> {
    let checks = sqlx::query_as::<_, DomainCheck>(
        r"
        SELECT id, store_id, domain, ok, verified, error, checked_at
        FROM domain_check_log
        WHERE store_id = $1
        ORDER BY checked_at DESC
        LIMIT $2
        ",
    )
    .bind(store_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(checks)
}
