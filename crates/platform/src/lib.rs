//! Storelane platform library.
//!
//! The platform service as a library, so routes and services can be tested
//! and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod domains;
pub mod entitlements;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod vercel;
pub mod whatsapp;

use axum::{Router, http::StatusCode, routing::get};

use state::AppState;

/// Assemble the full application router.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::storefront_routes())
        .merge(routes::merchant_routes())
        .merge(routes::domain_routes())
        .merge(routes::admin_routes())
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::with_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity; 503 when the database is unreachable.
async fn readiness(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
