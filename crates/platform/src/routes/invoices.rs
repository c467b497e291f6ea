//! Manual payment flow: merchants submit bank-transfer references, admins
//! review and approve them into subscriptions.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use storelane_core::{InvoiceId, PlanId, StoreId, SubscriptionId, SubscriptionPeriod};

use crate::db::invoices::{self, Invoice};
use crate::db::subscriptions::{self, Subscription};
use crate::db::{RepositoryError, plans};
use crate::error::AppError;
use crate::middleware::{RequireAdminToken, RequireMerchant};
use crate::state::AppState;

use super::owned_store;

#[derive(Debug, Deserialize)]
pub struct SubmitInvoiceRequest {
    pub plan_id: PlanId,
    pub period: SubscriptionPeriod,
    pub payment_reference: String,
}

/// Submit a payment reference for a plan change. The invoice starts
/// `pending`; the amount is priced from the plan at submission time.
///
/// # Errors
///
/// 404 for unknown or retired plans.
pub async fn submit(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path(store_id): Path<StoreId>,
    Json(body): Json<SubmitInvoiceRequest>,
) -> Result<(StatusCode, Json<Invoice>), AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;

    if body.payment_reference.trim().is_empty() {
        return Err(AppError::Validation("payment_reference is required".to_string()));
    }

    let plan = plans::get_plan(state.pool(), body.plan_id)
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| AppError::NotFound(format!("plan {}", body.plan_id)))?;

    let amount = match body.period {
        SubscriptionPeriod::Monthly => plan.monthly_price,
        SubscriptionPeriod::Yearly => plan.yearly_price,
    };

    let invoice = invoices::create_invoice(
        state.pool(),
        store.id,
        plan.id,
        body.period,
        amount,
        body.payment_reference.trim(),
    )
    .await?;

    tracing::info!(invoice_id = %invoice.id, store_id = %store.id, "Invoice submitted");
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// A store's invoice history, newest first.
///
/// # Errors
///
/// 404 on foreign or missing store.
pub async fn index(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<Invoice>>, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;
    let invoices = invoices::list_invoices_for_store(state.pool(), store.id).await?;
    Ok(Json(invoices))
}

/// A store's subscription history, newest first. The first row is the
/// authoritative one; older rows show past plan changes.
///
/// # Errors
///
/// 404 on foreign or missing store.
pub async fn subscription_history(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<Subscription>>, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;
    let history = subscriptions::history_for_store(state.pool(), store.id).await?;
    Ok(Json(history))
}

/// Admin queue of unresolved invoices.
///
/// # Errors
///
/// 500 on database failure.
pub async fn open_queue(
    State(state): State<AppState>,
    RequireAdminToken: RequireAdminToken,
) -> Result<Json<Vec<Invoice>>, AppError> {
    let invoices = invoices::list_open_invoices(state.pool()).await?;
    Ok(Json(invoices))
}

/// Move a pending invoice to `under_review`.
///
/// # Errors
///
/// 409 when the invoice is not pending.
pub async fn review(
    State(state): State<AppState>,
    RequireAdminToken: RequireAdminToken,
    Path(invoice_id): Path<InvoiceId>,
) -> Result<Json<Invoice>, AppError> {
    let invoice = invoices::mark_under_review(state.pool(), invoice_id).await?;
    Ok(Json(invoice))
}

#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    pub invoice: Invoice,
    pub subscription: Subscription,
}

/// Approve an invoice: one transaction flips the status and starts the
/// subscription, then the store's cached entitlements are dropped.
///
/// # Errors
///
/// 409 when the invoice is already resolved.
pub async fn approve(
    State(state): State<AppState>,
    RequireAdminToken: RequireAdminToken,
    Path(invoice_id): Path<InvoiceId>,
) -> Result<Json<ApproveResponse>, AppError> {
    let (invoice, subscription) = invoices::approve_invoice(state.pool(), invoice_id).await?;
    state.entitlements().invalidate(invoice.store_id).await;

    tracing::info!(
        invoice_id = %invoice.id,
        store_id = %invoice.store_id,
        subscription_id = %subscription.id,
        "Invoice approved"
    );
    Ok(Json(ApproveResponse {
        invoice,
        subscription,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

/// Reject an invoice with a reason shown to the merchant.
///
/// # Errors
///
/// 409 when the invoice is already resolved.
pub async fn reject(
    State(state): State<AppState>,
    RequireAdminToken: RequireAdminToken,
    Path(invoice_id): Path<InvoiceId>,
    Json(body): Json<RejectRequest>,
) -> Result<Json<Invoice>, AppError> {
    if body.reason.trim().is_empty() {
        return Err(AppError::Validation("a rejection reason is required".to_string()));
    }

    let invoice = invoices::reject_invoice(state.pool(), invoice_id, body.reason.trim()).await?;
    Ok(Json(invoice))
}

/// Cancel a subscription immediately.
///
/// # Errors
///
/// 404 for unknown subscriptions.
pub async fn cancel_subscription(
    State(state): State<AppState>,
    RequireAdminToken: RequireAdminToken,
    Path(subscription_id): Path<SubscriptionId>,
) -> Result<Json<Subscription>, AppError> {
    let subscription = subscriptions::cancel(state.pool(), subscription_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound(format!("subscription {subscription_id}"))
            }
            other => other.into(),
        })?;

    state.entitlements().invalidate(subscription.store_id).await;
    Ok(Json(subscription))
}
