//! Merchant store management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use storelane_core::{StoreId, features};

use crate::db::stores::{self, NewStore, SettingsUpdate, Store, ThemeUpdate};
use crate::error::AppError;
use crate::middleware::RequireMerchant;
use crate::state::AppState;

use super::owned_store;

#[derive(Debug, Deserialize)]
pub struct CreateStoreRequest {
    pub name: String,
    pub currency: String,
    pub whatsapp_number: String,
}

/// Create a store; the slug is derived from the name.
///
/// # Errors
///
/// 409 on a duplicate name under this merchant or an unusable name.
pub async fn create(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Json(body): Json<CreateStoreRequest>,
) -> Result<(StatusCode, Json<Store>), AppError> {
    if body.whatsapp_number.trim().is_empty() {
        return Err(AppError::Validation("whatsapp_number is required".to_string()));
    }

    let store = stores::create_store(
        state.pool(),
        NewStore {
            merchant_id,
            name: body.name,
            currency: body.currency,
            whatsapp_number: body.whatsapp_number,
        },
    )
    .await?;

    tracing::info!(store_id = %store.id, slug = %store.slug, "Store created");
    Ok((StatusCode::CREATED, Json(store)))
}

/// List the caller's stores, newest first.
///
/// # Errors
///
/// 500 on database failure.
pub async fn index(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
) -> Result<Json<Vec<Store>>, AppError> {
    let stores = stores::list_stores_for_merchant(state.pool(), merchant_id).await?;
    Ok(Json(stores))
}

/// Fetch one of the caller's stores.
///
/// # Errors
///
/// 404 when the store does not exist or belongs to another merchant.
pub async fn show(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Store>, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;
    Ok(Json(store))
}

/// Update theme colors and font. Requires the `theme` feature.
///
/// # Errors
///
/// 403 when the plan does not carry theme customization.
pub async fn update_theme(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path(store_id): Path<StoreId>,
    Json(body): Json<ThemeUpdate>,
) -> Result<Json<Store>, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;

    let plan = state.entitlements().active_plan(store.id).await?;
    if !plan.has_feature(features::THEME) {
        return Err(AppError::Forbidden(
            "theme customization is not included in your plan".to_string(),
        ));
    }

    let updated = stores::update_theme(state.pool(), store.id, body).await?;
    Ok(Json(updated))
}

/// Update business settings (currency, delivery, WhatsApp relay).
///
/// # Errors
///
/// 404 on foreign or missing store.
pub async fn update_settings(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path(store_id): Path<StoreId>,
    Json(body): Json<SettingsUpdate>,
) -> Result<Json<Store>, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;
    let updated = stores::update_settings(state.pool(), store.id, body).await?;
    Ok(Json(updated))
}

/// Deactivate a store. The storefront stops resolving; data is kept.
///
/// # Errors
///
/// 404 on foreign or missing store.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path(store_id): Path<StoreId>,
) -> Result<StatusCode, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;
    stores::set_active(state.pool(), store.id, false).await?;

    tracing::info!(store_id = %store.id, "Store deactivated");
    Ok(StatusCode::NO_CONTENT)
}
