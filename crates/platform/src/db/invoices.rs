//! Invoice repository: merchant-submitted payment references, reviewed by
//! a human admin. Approval inserts the subscription row in the same
//! transaction as the status change.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use storelane_core::{InvoiceId, InvoiceStatus, PlanId, StoreId, SubscriptionPeriod};

use super::RepositoryError;
use super::subscriptions::Subscription;

/// A requested plan change backed by a bank-transfer reference.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub store_id: StoreId,
    pub plan_id: PlanId,
    pub period: SubscriptionPeriod,
    pub amount: Decimal,
    pub payment_reference: String,
    pub status: InvoiceStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

const INVOICE_COLUMNS: &str = r"
    id, store_id, plan_id, period, amount, payment_reference,
    status, rejection_reason, created_at, resolved_at
";

/// Submit a payment reference for a plan change (status `pending`).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn create_invoice(
    pool: &PgPool,
    store_id: StoreId,
    plan_id: PlanId,
    period: SubscriptionPeriod,
    amount: Decimal,
    payment_reference: &str,
) -> Result<Invoice, RepositoryError> {
    let invoice = sqlx::query_as::<_, Invoice>(&format!(
        r"
        INSERT INTO invoices (store_id, plan_id, period, amount, payment_reference)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {INVOICE_COLUMNS}
        "
    ))
    .bind(store_id)
    .bind(plan_id)
    .bind(period)
    .bind(amount)
    .bind(payment_reference)
    .fetch_one(pool)
    .await?;

    Ok(invoice)
}

/// Fetch one invoice.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_invoice(
    pool: &PgPool,
    invoice_id: InvoiceId,
) -> Result<Option<Invoice>, RepositoryError> {
    let invoice = sqlx::query_as::<_, Invoice>(&format!(
        "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"
    ))
    .bind(invoice_id)
    .fetch_optional(pool)
    .await?;

    Ok(invoice)
}

/// List invoices for admin review, optionally filtered to open ones.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_open_invoices(pool: &PgPool) -> Result<Vec<Invoice>, RepositoryError> {
    let invoices = sqlx::query_as::<_, Invoice>(&format!(
        r"
        SELECT {INVOICE_COLUMNS}
        FROM invoices
        WHERE status IN ('pending', 'under_review')
        ORDER BY created_at
        "
    ))
    .fetch_all(pool)
    .await?;

    Ok(invoices)
}

/// List a store's invoices, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_invoices_for_store(
    pool: &PgPool,
    store_id: StoreId,
) -> Result<Vec<Invoice>, RepositoryError> {
    let invoices = sqlx::query_as::<_, Invoice>(&format!(
        "SELECT {INVOICE_COLUMNS} FROM invoices WHERE store_id = $1 ORDER BY created_at DESC"
    ))
    .bind(store_id)
    .fetch_all(pool)
    .await?;

    Ok(invoices)
}

/// Move a pending invoice to `under_review`.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the invoice is not pending.
pub async fn mark_under_review(
    pool: &PgPool,
    invoice_id: InvoiceId,
) -> Result<Invoice, RepositoryError> {
    sqlx::query_as::<_, Invoice>(&format!(
        r"
        UPDATE invoices
        SET status = 'under_review'
        WHERE id = $1 AND status = 'pending'
        RETURNING {INVOICE_COLUMNS}
        "
    ))
    .bind(invoice_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| RepositoryError::Conflict("invoice is not pending".to_string()))
}

/// Approve an invoice and activate the paid-for subscription.
///
/// The status flip (guarded on an open state) and the subscription insert
/// happen in one transaction: either the plan change fully lands or nothing
/// does.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the invoice is already resolved.
pub async fn approve_invoice(
    pool: &PgPool,
    invoice_id: InvoiceId,
) -> Result<(Invoice, Subscription), RepositoryError> {
    let mut tx = pool.begin().await?;

    let invoice = sqlx::query_as::<_, Invoice>(&format!(
        r"
        UPDATE invoices
        SET status = 'approved', resolved_at = NOW()
        WHERE id = $1 AND status IN ('pending', 'under_review')
        RETURNING {INVOICE_COLUMNS}
        "
    ))
    .bind(invoice_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| RepositoryError::Conflict("invoice is already resolved".to_string()))?;

    let ends_at = Utc::now() + Duration::days(invoice.period.days());
    let subscription = sqlx::query_as::<_, Subscription>(
        r"
        INSERT INTO subscriptions (store_id, plan_id, period, started_at, ends_at, active)
        VALUES ($1, $2, $3, NOW(), $4, TRUE)
        RETURNING id, store_id, plan_id, period, started_at, ends_at, active
        ",
    )
    .bind(invoice.store_id)
    .bind(invoice.plan_id)
    .bind(invoice.period)
    .bind(ends_at)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((invoice, subscription))
}

/// Reject an invoice, recording the reason.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the invoice is already resolved.
pub async fn reject_invoice(
    pool: &PgPool,
    invoice_id: InvoiceId,
    reason: &str,
) -> Result<Invoice, RepositoryError> {
    sqlx::query_as::<_, Invoice>(&format!(
        r"
        UPDATE invoices
        SET status = 'rejected', rejection_reason = $2, resolved_at = NOW()
        WHERE id = $1 AND status IN ('pending', 'under_review')
        RETURNING {INVOICE_COLUMNS}
        "
    ))
    .bind(invoice_id)
    .bind(reason)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| RepositoryError::Conflict("invoice is already resolved".to_string()))
}
