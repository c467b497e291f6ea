//! Product management, scoped to one store.
//!
//! Creation enforces the plan's product limit. The check is advisory at the
//! data layer, so concurrent creates can briefly overshoot; the next create
//! is rejected.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use storelane_core::{ProductId, StoreId};

use crate::db::catalog::{self, Product, ProductInput};
use crate::entitlements::enforce_limit;
use crate::error::AppError;
use crate::middleware::RequireMerchant;
use crate::state::AppState;

use super::owned_store;

/// Create a product, enforcing the plan's product limit.
///
/// # Errors
///
/// 403 with the remaining count when the plan limit is reached.
pub async fn create(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path(store_id): Path<StoreId>,
    Json(body): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;

    let plan = state.entitlements().active_plan(store.id).await?;
    let current = catalog::count_products(state.pool(), store.id).await?;
    let check = enforce_limit(current, plan.product_limit);
    if !check.allowed {
        return Err(AppError::Forbidden(
            "product limit reached for your plan".to_string(),
        ));
    }

    let product = catalog::create_product(state.pool(), store.id, body).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub available_only: bool,
}

/// List a store's products.
///
/// # Errors
///
/// 404 on foreign or missing store.
pub async fn index(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path(store_id): Path<StoreId>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;
    let products = catalog::list_products(state.pool(), store.id, query.available_only).await?;
    Ok(Json(products))
}

/// Fetch one product.
///
/// # Errors
///
/// 404 when the product is not in this store.
pub async fn show(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path((store_id, product_id)): Path<(StoreId, ProductId)>,
) -> Result<Json<Product>, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;
    let product = catalog::get_product(state.pool(), store.id, product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;
    Ok(Json(product))
}

/// Replace a product's mutable fields.
///
/// # Errors
///
/// 404 when the product is not in this store.
pub async fn update(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path((store_id, product_id)): Path<(StoreId, ProductId)>,
    Json(body): Json<ProductInput>,
) -> Result<Json<Product>, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;
    let product = catalog::update_product(state.pool(), store.id, product_id, body).await?;
    Ok(Json(product))
}

/// Delete a product.
///
/// # Errors
///
/// 404 when the product is not in this store.
pub async fn remove(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path((store_id, product_id)): Path<(StoreId, ProductId)>,
) -> Result<StatusCode, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;
    catalog::delete_product(state.pool(), store.id, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
