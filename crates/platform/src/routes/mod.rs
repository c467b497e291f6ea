//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database ping)
//!
//! # Public storefront
//! GET  /s/{slug}                        - Store page data (theme + catalog)
//! POST /s/{slug}/checkout               - Place order, get WhatsApp link
//! GET  /api/plans                       - Active plans (pricing page)
//!
//! # Merchant surface (x-merchant-id injected by the auth gateway)
//! POST   /api/stores                    - Create store
//! GET    /api/stores                    - List own stores
//! GET    /api/stores/{id}               - Fetch own store
//! PUT    /api/stores/{id}/theme         - Update theme (feature-gated)
//! PUT    /api/stores/{id}/settings      - Update business settings
//! DELETE /api/stores/{id}               - Deactivate store
//! GET    /api/stores/{id}/entitlements  - Plan info + limit snapshot
//!
//! POST   /api/stores/{id}/categories    - Create category (feature-gated)
//! GET    /api/stores/{id}/categories    - List categories
//! PUT    /api/stores/{id}/categories/{category_id}
//! DELETE /api/stores/{id}/categories/{category_id}
//!
//! POST   /api/stores/{id}/products      - Create product (limit-enforced)
//! GET    /api/stores/{id}/products      - List products
//! GET    /api/stores/{id}/products/{product_id}
//! PUT    /api/stores/{id}/products/{product_id}
//! DELETE /api/stores/{id}/products/{product_id}
//!
//! GET    /api/stores/{id}/orders        - List orders
//! GET    /api/stores/{id}/orders/{order_id}
//! PUT    /api/stores/{id}/orders/{order_id}/status
//!
//! POST   /api/stores/{id}/invoices      - Submit payment reference
//! GET    /api/stores/{id}/invoices      - Invoice history
//! GET    /api/stores/{id}/subscriptions - Subscription history
//!
//! # Domains (merchant, feature-gated)
//! POST   /api/connect-domain            - Normalize + register + link
//! GET    /api/domain-status             - Re-check + persist
//! DELETE /api/connect-domain            - Provider remove + unlink
//! GET    /api/cron/refresh-domains      - Scheduled sweep (cron auth)
//!
//! # Admin surface (x-admin-token)
//! POST /api/admin/plans                 - Create plan
//! GET  /api/admin/plans                 - List all plans
//! PUT  /api/admin/plans/{id}            - Update plan
//! GET  /api/admin/invoices              - Open invoices queue
//! POST /api/admin/invoices/{id}/review  - Move pending -> under_review
//! POST /api/admin/invoices/{id}/approve - Approve + create subscription
//! POST /api/admin/invoices/{id}/reject  - Reject with reason
//! POST /api/admin/subscriptions/{id}/cancel
//! ```

pub mod categories;
pub mod domains;
pub mod entitlements;
pub mod invoices;
pub mod orders;
pub mod plans;
pub mod products;
pub mod storefront;
pub mod stores;

use axum::{
    Router,
    routing::{get, post, put},
};

use storelane_core::{MerchantId, StoreId};

use crate::db::stores::{self as store_repo, Store};
use crate::error::AppError;
use crate::state::AppState;

/// Load a store and verify the caller owns it.
///
/// A store belonging to another merchant is reported as not found so the
/// surface does not leak store ids.
pub(crate) async fn owned_store(
    state: &AppState,
    merchant_id: MerchantId,
    store_id: StoreId,
) -> Result<Store, AppError> {
    let store = store_repo::get_store(state.pool(), store_id)
        .await?
        .filter(|s| s.merchant_id == merchant_id)
        .ok_or_else(|| AppError::NotFound(format!("store {store_id}")))?;

    Ok(store)
}

/// Public storefront routes.
pub fn storefront_routes() -> Router<AppState> {
    Router::new()
        .route("/s/{slug}", get(storefront::show))
        .route("/s/{slug}/checkout", post(storefront::checkout))
        .route("/api/plans", get(plans::list_public))
}

/// Merchant-facing store and catalog routes.
pub fn merchant_routes() -> Router<AppState> {
    Router::new()
        .route("/api/stores", post(stores::create).get(stores::index))
        .route("/api/stores/{id}", get(stores::show).delete(stores::deactivate))
        .route("/api/stores/{id}/theme", put(stores::update_theme))
        .route("/api/stores/{id}/settings", put(stores::update_settings))
        .route("/api/stores/{id}/entitlements", get(entitlements::show))
        .route(
            "/api/stores/{id}/categories",
            post(categories::create).get(categories::index),
        )
        .route(
            "/api/stores/{id}/categories/{category_id}",
            put(categories::update).delete(categories::remove),
        )
        .route(
            "/api/stores/{id}/products",
            post(products::create).get(products::index),
        )
        .route(
            "/api/stores/{id}/products/{product_id}",
            get(products::show).put(products::update).delete(products::remove),
        )
        .route("/api/stores/{id}/orders", get(orders::index))
        .route("/api/stores/{id}/orders/{order_id}", get(orders::show))
        .route("/api/stores/{id}/orders/{order_id}/status", put(orders::update_status))
        .route(
            "/api/stores/{id}/invoices",
            post(invoices::submit).get(invoices::index),
        )
        .route(
            "/api/stores/{id}/subscriptions",
            get(invoices::subscription_history),
        )
}

/// Domain linking routes (merchant plus the cron sweep).
pub fn domain_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/connect-domain",
            post(domains::connect).delete(domains::disconnect),
        )
        .route("/api/domain-status", get(domains::status))
        .route("/api/cron/refresh-domains", get(domains::refresh_all))
}

/// Admin console routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/plans", post(plans::create).get(plans::index))
        .route("/api/admin/plans/{id}", put(plans::update))
        .route("/api/admin/invoices", get(invoices::open_queue))
        .route("/api/admin/invoices/{id}/review", post(invoices::review))
        .route("/api/admin/invoices/{id}/approve", post(invoices::approve))
        .route("/api/admin/invoices/{id}/reject", post(invoices::reject))
        .route(
            "/api/admin/subscriptions/{id}/cancel",
            post(invoices::cancel_subscription),
        )
}
