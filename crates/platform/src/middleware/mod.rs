//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Auth extractors applied per-route (`RequireMerchant`, `RequireAdminToken`)

pub mod auth;

pub use auth::{RequireAdminToken, RequireMerchant};
