//! Merchant order views and fulfillment status.
//!
//! Orders are created by the public checkout endpoint; merchants only read
//! them and move the fulfillment status.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use storelane_core::{OrderId, OrderStatus, StoreId};

use crate::db::orders::{self, Order, OrderLine};
use crate::error::AppError;
use crate::middleware::RequireMerchant;
use crate::state::AppState;

use super::owned_store;

/// List a store's orders, newest first.
///
/// # Errors
///
/// 404 on foreign or missing store.
pub async fn index(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<Order>>, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;
    let orders = orders::list_orders(state.pool(), store.id).await?;
    Ok(Json(orders))
}

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    /// Line items decoded from the denormalized jsonb payload.
    pub lines: Vec<OrderLine>,
}

/// Fetch one order with its decoded line items.
///
/// # Errors
///
/// 404 when the order is not in this store; 500 when the stored line items
/// no longer decode.
pub async fn show(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path((store_id, order_id)): Path<(StoreId, OrderId)>,
) -> Result<Json<OrderDetail>, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;
    let order = orders::get_order(state.pool(), store.id, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))?;
    let lines = order.lines()?;
    Ok(Json(OrderDetail { order, lines }))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

/// Move an order's fulfillment status.
///
/// # Errors
///
/// 404 when the order is not in this store.
pub async fn update_status(
    State(state): State<AppState>,
    RequireMerchant(merchant_id): RequireMerchant,
    Path((store_id, order_id)): Path<(StoreId, OrderId)>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Order>, AppError> {
    let store = owned_store(&state, merchant_id, store_id).await?;
    let order = orders::update_status(state.pool(), store.id, order_id, body.status).await?;
    Ok(Json(order))
}
