//! Subscription repository.
//!
//! Multiple historical rows may exist per store; only the most recent by
//! `started_at` is authoritative.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storelane_core::{PlanId, StoreId, SubscriptionId, SubscriptionPeriod};

use super::RepositoryError;

/// A store↔plan link for a billing period.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub store_id: StoreId,
    pub plan_id: PlanId,
    pub period: SubscriptionPeriod,
    pub started_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub active: bool,
}

const SUBSCRIPTION_COLUMNS: &str = "id, store_id, plan_id, period, started_at, ends_at, active";

/// The authoritative subscription for a store: most recent by start time.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn latest_for_store(
    pool: &PgPool,
    store_id: StoreId,
) -> Result<Option<Subscription>, RepositoryError> {
    let subscription = sqlx::query_as::<_, Subscription>(&format!(
        r"
        SELECT {SUBSCRIPTION_COLUMNS}
        FROM subscriptions
        WHERE store_id = $1
        ORDER BY started_at DESC
        LIMIT 1
        "
    ))
    .bind(store_id)
    .fetch_optional(pool)
    .await?;

    Ok(subscription)
}

/// List a store's subscription history, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn history_for_store(
    pool: &PgPool,
    store_id: StoreId,
) -> Result<Vec<Subscription>, RepositoryError> {
    let subscriptions = sqlx::query_as::<_, Subscription>(&format!(
        r"
        SELECT {SUBSCRIPTION_COLUMNS}
        FROM subscriptions
        WHERE store_id = $1
        ORDER BY started_at DESC
        "
    ))
    .bind(store_id)
    .fetch_all(pool)
    .await?;

    Ok(subscriptions)
}

/// End a subscription: `active = false`, `ends_at = now`.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the subscription does not exist.
pub async fn cancel(
    pool: &PgPool,
    subscription_id: SubscriptionId,
) -> Result<Subscription, RepositoryError> {
    sqlx::query_as::<_, Subscription>(&format!(
        r"
        UPDATE subscriptions
        SET active = FALSE, ends_at = NOW()
        WHERE id = $1
        RETURNING {SUBSCRIPTION_COLUMNS}
        "
    ))
    .bind(subscription_id)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)
}
