//! Custom-domain linking endpoints and the scheduled refresh sweep.

use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};

use storelane_core::{MerchantId, StoreId, features};

use crate::db::audit::{self, DomainCheck};
use crate::db::stores::Store;
use crate::domains::{DomainStatusReport, SweepOutcome};
use crate::error::AppError;
use crate::middleware::RequireMerchant;
use crate::state::AppState;

use super::owned_store;

/// Set by the hosting platform on scheduled invocations.
const CRON_HEADER: &str = "x-vercel-cron";
/// Shared-secret alternative for self-hosted schedulers.
const CRON_SECRET_HEADER: &str = "x-cron-secret";

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub store_id: StoreId,
    pub domain: String,
}

#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: DomainStatusReport,
}

async fn domain_entitled_store(
    state: &AppState,
    merchant_id: MerchantId,
    store_id: StoreId,
) -> Result<Store, AppError> {
    let store = owned_store(state, merchant_id, store_id).await?;

    let plan = state.entitlements().active_plan(store.id).await?;
    if !plan.has_feature(features::CUSTOM_DOMAIN) {
        return Err(AppError::Forbidden(
            "custom domains are not included in your plan".to_string(),
        ));
    }

    Ok(store)
}

/// Register a domain with the hosting project and link it to the store.
///
/// An unverified domain is a success with `needs_dns: true` and DNS
/// instructions; relinking a domain held by another store silently moves it.
///
/// # Errors
///
/// 403 without the `custom_domain` feature; provider failures echo the
/// provider's status.
pub async fn connect(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Json(body): Json<ConnectRequest>,
) -> Result<Json<ConnectResponse>, AppError> {
    let store = domain_entitled_store(&state, merchant_id, body.store_id).await?;
    let report = state.registrar().connect(store.id, &body.domain).await?;

    Ok(Json(ConnectResponse {
        success: true,
        report,
    }))
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub store_id: StoreId,
}

/// How much sweep history the status endpoint returns.
const RECENT_CHECK_LIMIT: i64 = 10;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub report: DomainStatusReport,
    pub recent_checks: Vec<DomainCheck>,
}

/// Re-check and persist the status of the store's linked domain, with the
/// store's recent sweep history.
///
/// # Errors
///
/// 404 when the store has no linked domain.
pub async fn status(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, AppError> {
    let store = owned_store(&state, merchant_id, query.store_id).await?;
    let domain = store
        .custom_domain
        .ok_or_else(|| AppError::NotFound("no domain linked to this store".to_string()))?;

    let report = state
        .registrar()
        .refresh(&domain)
        .await?
        .ok_or_else(|| AppError::NotFound("no domain linked to this store".to_string()))?;

    let recent_checks = audit::recent_checks(state.pool(), store.id, RECENT_CHECK_LIMIT).await?;

    Ok(Json(StatusResponse {
        report,
        recent_checks,
    }))
}

/// Remove the store's domain from the hosting project and unlink it.
///
/// # Errors
///
/// Provider failures leave the link in place for a later retry.
pub async fn disconnect(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Query(query): Query<StatusQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = owned_store(&state, merchant_id, query.store_id).await?;
    state.registrar().disconnect(&store).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Scheduled sweep over every linked domain.
///
/// Authorized by the platform cron header or the shared cron secret.
///
/// # Errors
///
/// 401 without either credential.
pub async fn refresh_all(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let platform_cron = headers.contains_key(CRON_HEADER);
    let secret_ok = headers
        .get(CRON_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|candidate| state.config().cron_secret_matches(candidate));

    if !platform_cron && !secret_ok {
        return Err(AppError::Unauthorized("cron credential required".to_string()));
    }

    let body = match state.registrar().refresh_all().await? {
        SweepOutcome::Skipped => serde_json::json!({ "ok": true, "skipped": true }),
        SweepOutcome::Completed { count, results } => {
            serde_json::json!({ "ok": true, "count": count, "results": results })
        }
    };

    Ok(Json(body))
}
