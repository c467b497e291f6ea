//! Public storefront endpoints.
//!
//! No authentication: these serve shoppers. Carts live client-side; the
//! server only sees the final checkout, reprices it from the catalog, and
//! hands back a WhatsApp deep link for the order conversation.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storelane_core::{OrderId, ProductId};

use crate::db::catalog::{self, Category, Product};
use crate::db::orders::{self, NewOrder, OrderLine};
use crate::db::stores::{self, Store};
use crate::error::AppError;
use crate::state::AppState;
use crate::whatsapp;

/// How many distinct line items one checkout may carry.
const MAX_CART_LINES: usize = 100;

/// Public projection of a store. Merchant identity and relay settings
/// stay server-side.
#[derive(Debug, Serialize)]
pub struct StorefrontView {
    pub name: String,
    pub slug: String,
    pub theme_primary_color: String,
    pub theme_accent_color: String,
    pub theme_font: String,
    pub currency: String,
    pub delivery_enabled: bool,
    pub delivery_fee: Decimal,
}

impl StorefrontView {
    fn from_store(store: &Store) -> Self {
        Self {
            name: store.name.clone(),
            slug: store.slug.as_str().to_string(),
            theme_primary_color: store.theme_primary_color.clone(),
            theme_accent_color: store.theme_accent_color.clone(),
            theme_font: store.theme_font.clone(),
            currency: store.currency.clone(),
            delivery_enabled: store.delivery_enabled,
            delivery_fee: store.delivery_fee,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StorefrontResponse {
    pub store: StorefrontView,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

/// Store page data: theme, categories, and available products.
///
/// # Errors
///
/// 404 for unknown or deactivated stores.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<StorefrontResponse>, AppError> {
    let store = stores::get_active_store_by_slug(state.pool(), &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store '{slug}'")))?;

    let categories = catalog::list_categories(state.pool(), store.id).await?;
    let products = catalog::list_products(state.pool(), store.id, true).await?;

    Ok(Json(StorefrontResponse {
        store: StorefrontView::from_store(&store),
        categories,
        products,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub items: Vec<CartLine>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_id: OrderId,
    pub whatsapp_url: String,
}

/// Place an order and return the pre-filled WhatsApp link.
///
/// Prices are recomputed server-side from the catalog; client-supplied
/// prices are never trusted. Line items are denormalized into the order so
/// later catalog edits leave history intact.
///
/// # Errors
///
/// 400 for an empty cart or bad quantities, 404 for unknown stores or
/// products no longer available.
pub async fn checkout(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), AppError> {
    let store = stores::get_active_store_by_slug(state.pool(), &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store '{slug}'")))?;

    if body.items.is_empty() {
        return Err(AppError::Validation("cart is empty".to_string()));
    }
    if body.items.len() > MAX_CART_LINES {
        return Err(AppError::Validation("too many line items".to_string()));
    }
    if body.customer_name.trim().is_empty() || body.customer_phone.trim().is_empty() {
        return Err(AppError::Validation(
            "customer name and phone are required".to_string(),
        ));
    }

    let mut lines = Vec::with_capacity(body.items.len());
    let mut subtotal = Decimal::ZERO;

    for item in &body.items {
        if item.quantity == 0 {
            return Err(AppError::Validation(format!(
                "invalid quantity for product {}",
                item.product_id
            )));
        }

        let product = catalog::get_product(state.pool(), store.id, item.product_id)
            .await?
            .filter(|p| p.available)
            .ok_or_else(|| {
                AppError::NotFound(format!("product {} is not available", item.product_id))
            })?;

        let line = OrderLine {
            product_id: product.id,
            name: product.name,
            price: product.price,
            quantity: item.quantity,
        };
        subtotal += line.total();
        lines.push(line);
    }

    let delivery_fee = if store.delivery_enabled {
        store.delivery_fee
    } else {
        Decimal::ZERO
    };
    let total = subtotal + delivery_fee;

    let order = orders::create_order(
        state.pool(),
        store.id,
        NewOrder {
            customer_name: body.customer_name.clone(),
            customer_phone: body.customer_phone.clone(),
            customer_address: body.customer_address.clone(),
            lines: lines.clone(),
            subtotal,
            delivery_fee,
            total,
        },
    )
    .await?;

    let template = if store.order_template.trim().is_empty() {
        whatsapp::DEFAULT_TEMPLATE
    } else {
        &store.order_template
    };
    let message = whatsapp::render_order_message(
        template,
        order.id.into(),
        &lines,
        total,
        &store.currency,
        &body.customer_name,
        &body.customer_phone,
        body.customer_address.as_deref().unwrap_or(""),
    );
    let whatsapp_url = whatsapp::deep_link(&store, &message);

    tracing::info!(store_id = %store.id, order_id = %order.id, "Order placed");
    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order_id: order.id,
            whatsapp_url,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_line_rejects_negative_quantity() {
        let ok: CartLine = serde_json::from_str(r#"{"product_id": 7, "quantity": 2}"#).unwrap();
        assert_eq!(ok.quantity, 2);

        let negative = serde_json::from_str::<CartLine>(r#"{"product_id": 7, "quantity": -1}"#);
        assert!(negative.is_err());
    }

    #[test]
    fn test_cart_quantity_feeds_order_line_total() {
        let line: CartLine = serde_json::from_str(r#"{"product_id": 7, "quantity": 3}"#).unwrap();
        let priced = OrderLine {
            product_id: line.product_id,
            name: "Flat White".to_string(),
            price: Decimal::new(450, 2),
            quantity: line.quantity,
        };
        assert_eq!(priced.total(), Decimal::new(1350, 2));
    }
}
