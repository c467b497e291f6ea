//! Category management, scoped to one store.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use storelane_core::{CategoryId, StoreId, features};

use crate::db::catalog::{self, Category};
use crate::error::AppError;
use crate::middleware::RequireMerchant;
use crate::state::AppState;

use super::owned_store;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub position: i32,
}

/// Create a category. Requires the `categories` feature.
///
/// # Errors
///
/// 403 when the plan does not include categories.
pub async fn create(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path(store_id): Path<StoreId>,
    Json(body): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;

    let plan = state.entitlements().active_plan(store.id).await?;
    if !plan.has_feature(features::CATEGORIES) {
        return Err(AppError::Forbidden(
            "categories are not included in your plan".to_string(),
        ));
    }

    let category =
        catalog::create_category(state.pool(), store.id, &body.name, body.position).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// List a store's categories in display order.
///
/// # Errors
///
/// 404 on foreign or missing store.
pub async fn index(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<Category>>, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;
    let categories = catalog::list_categories(state.pool(), store.id).await?;
    Ok(Json(categories))
}

/// Rename or reposition a category.
///
/// # Errors
///
/// 404 when the category is not in this store.
pub async fn update(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path((store_id, category_id)): Path<(StoreId, CategoryId)>,
    Json(body): Json<CategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;
    let category =
        catalog::update_category(state.pool(), store.id, category_id, &body.name, body.position)
            .await?;
    Ok(Json(category))
}

/// Delete a category; its products become uncategorized.
///
/// # Errors
///
/// 404 when the category is not in this store.
pub async fn remove(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path((store_id, category_id)): Path<(StoreId, CategoryId)>,
) -> Result<StatusCode, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;
    catalog::delete_category(state.pool(), store.id, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
