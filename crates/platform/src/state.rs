//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::PlatformConfig;
use crate::domains::DomainRegistrar;
use crate::entitlements::EntitlementResolver;
use crate::vercel::{VercelClient, VercelError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the pool, configuration, and the
/// provider-facing services built from them.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PlatformConfig,
    pool: PgPool,
    registrar: DomainRegistrar,
    entitlements: EntitlementResolver,
}

impl AppState {
    /// Create the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn new(config: PlatformConfig, pool: PgPool) -> Result<Self, VercelError> {
        let client = VercelClient::new(&config.vercel)?;
        let registrar = DomainRegistrar::new(pool.clone(), client);
        let entitlements = EntitlementResolver::new(pool.clone(), config.entitlement_source);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                registrar,
                entitlements,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &PlatformConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn registrar(&self) -> &DomainRegistrar {
        &self.inner.registrar
    }

    #[must_use]
    pub fn entitlements(&self) -> &EntitlementResolver {
        &self.inner.entitlements
    }
}
