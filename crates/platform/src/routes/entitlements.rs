//! Entitlement snapshot for the merchant dashboard.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use storelane_core::StoreId;

use crate::db::catalog;
use crate::entitlements::{LimitCheck, PlanInfo, enforce_limit};
use crate::error::AppError;
use crate::middleware::RequireMerchant;
use crate::state::AppState;

use super::owned_store;

#[derive(Debug, Serialize)]
pub struct EntitlementResponse {
    pub plan: PlanInfo,
    /// Product-limit snapshot against the current catalog size.
    pub products: LimitCheck,
}

/// Current plan, features, and limit headroom for a store.
///
/// A store without a live subscription gets the empty plan, not an error;
/// the dashboard renders gated actions locked.
///
/// # Errors
///
/// 404 on foreign or missing store.
pub async fn show(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path(store_id): Path<StoreId>,
) -> Result<Json<EntitlementResponse>, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;

    let plan = state.entitlements().active_plan(store.id).await?;
    let current = catalog::count_products(state.pool(), store.id).await?;
    let products = enforce_limit(current, plan.product_limit);

    Ok(Json(EntitlementResponse { plan, products }))
}
