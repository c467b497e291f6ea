//! Plan entitlement resolution.
//!
//! Answers "what may this store do" from its most recent subscription.
//! Two backends share one resolver: the subscription→plan join (authoritative)
//! and a hardcoded plan-name table for deployments without billing tables.
//! Exactly one backend is active, selected by `ENTITLEMENT_SOURCE`.
//!
//! Resolution fails open to "no extra features": a store without a live
//! subscription gets `PlanInfo::none()`, never an error. Only transport
//! failures propagate.

mod static_table;

use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;

use storelane_core::{PlanId, StoreId};

use crate::config::EntitlementSource;
use crate::db::{RepositoryError, plans, subscriptions};

/// Entitlement cache TTL. Kept short so plan changes show up quickly.
const CACHE_TTL: Duration = Duration::from_secs(60);
const CACHE_CAPACITY: u64 = 10_000;

/// A store's resolved entitlements.
#[derive(Debug, Clone, Serialize)]
pub struct PlanInfo {
    pub plan_id: Option<PlanId>,
    pub plan_name: Option<String>,
    /// `None` = unlimited.
    pub product_limit: Option<i64>,
    pub variant_limit: Option<i64>,
    pub storage_limit_mb: Option<i64>,
    pub features: Vec<String>,
}

impl PlanInfo {
    /// The empty entitlement set: no plan, no features, no limits. Base
    /// functionality stays available to a store without a subscription.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            plan_id: None,
            plan_name: None,
            product_limit: None,
            variant_limit: None,
            storage_limit_mb: None,
            features: Vec::new(),
        }
    }

    /// Whether the plan carries a feature key. Always false on the empty info.
    #[must_use]
    pub fn has_feature(&self, key: &str) -> bool {
        self.features.iter().any(|f| f == key)
    }

    fn from_plan(plan: &plans::Plan) -> Self {
        Self {
            plan_id: Some(plan.id),
            plan_name: Some(plan.name.clone()),
            product_limit: plan.product_limit.map(i64::from),
            variant_limit: plan.variant_limit.map(i64::from),
            storage_limit_mb: plan.storage_limit_mb.map(i64::from),
            features: plan.features.clone(),
        }
    }
}

/// Result of checking one numeric limit.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LimitCheck {
    pub allowed: bool,
    /// `None` = unlimited.
    pub remaining: Option<i64>,
}

/// Check a current count against a plan limit. Advisory only; the data
/// layer never blocks on it.
#[must_use]
pub fn enforce_limit(current_count: i64, limit: Option<i64>) -> LimitCheck {
    match limit {
        None => LimitCheck {
            allowed: true,
            remaining: None,
        },
        Some(limit) => {
            let remaining = (limit - current_count).max(0);
            LimitCheck {
                allowed: remaining > 0,
                remaining: Some(remaining),
            }
        }
    }
}

/// Resolves and caches per-store entitlements.
#[derive(Clone)]
pub struct EntitlementResolver {
    pool: PgPool,
    source: EntitlementSource,
    cache: Cache<StoreId, PlanInfo>,
}

impl EntitlementResolver {
    #[must_use]
    pub fn new(pool: PgPool, source: EntitlementSource) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            pool,
            source,
            cache,
        }
    }

    /// The store's current entitlements, cached for a short TTL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` only on transport failures; a
    /// missing or lapsed subscription resolves to `PlanInfo::none()`.
    pub async fn active_plan(&self, store_id: StoreId) -> Result<PlanInfo, RepositoryError> {
        if let Some(cached) = self.cache.get(&store_id).await {
            return Ok(cached);
        }

        let info = self.resolve(store_id).await?;
        self.cache.insert(store_id, info.clone()).await;
        Ok(info)
    }

    /// Drop the cached entry for a store. Called after subscription writes.
    pub async fn invalidate(&self, store_id: StoreId) {
        self.cache.invalidate(&store_id).await;
    }

    async fn resolve(&self, store_id: StoreId) -> Result<PlanInfo, RepositoryError> {
        let Some(subscription) = subscriptions::latest_for_store(&self.pool, store_id).await?
        else {
            return Ok(PlanInfo::none());
        };

        let lapsed = !subscription.active
            || subscription.ends_at.is_some_and(|ends| ends < Utc::now());
        if lapsed {
            return Ok(PlanInfo::none());
        }

        let Some(plan) = plans::get_plan(&self.pool, subscription.plan_id).await? else {
            tracing::warn!(%store_id, plan_id = %subscription.plan_id, "Subscription references missing plan");
            return Ok(PlanInfo::none());
        };

        let info = match self.source {
            EntitlementSource::Subscriptions => PlanInfo::from_plan(&plan),
            EntitlementSource::Static => match static_table::lookup(&plan.name) {
                Some(mut info) => {
                    info.plan_id = Some(plan.id);
                    info
                }
                None => {
                    tracing::warn!(plan = %plan.name, "Plan missing from static entitlement table");
                    PlanInfo::none()
                }
            },
        };

        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enforce_limit_unlimited() {
        let check = enforce_limit(1_000_000, None);
        assert!(check.allowed);
        assert!(check.remaining.is_none());
    }

    #[test]
    fn test_enforce_limit_under() {
        let check = enforce_limit(3, Some(5));
        assert!(check.allowed);
        assert_eq!(check.remaining, Some(2));
    }

    #[test]
    fn test_enforce_limit_at_boundary() {
        let check = enforce_limit(5, Some(5));
        assert!(!check.allowed);
        assert_eq!(check.remaining, Some(0));
    }

    #[test]
    fn test_enforce_limit_over_clamps_remaining() {
        let check = enforce_limit(9, Some(5));
        assert!(!check.allowed);
        assert_eq!(check.remaining, Some(0));
    }

    #[test]
    fn test_empty_info_has_no_features() {
        let info = PlanInfo::none();
        assert!(!info.has_feature("custom_domain"));
        assert!(info.plan_id.is_none());
    }

    #[test]
    fn test_empty_info_does_not_block_writes() {
        let info = PlanInfo::none();
        assert_eq!(info.product_limit, None);
        assert!(enforce_limit(0, info.product_limit).allowed);
    }

    #[test]
    fn test_has_feature_is_exact_match() {
        let info = PlanInfo {
            plan_id: None,
            plan_name: Some("growth".to_string()),
            product_limit: None,
            variant_limit: None,
            storage_limit_mb: None,
            features: vec!["custom_domain".to_string()],
        };
        assert!(info.has_feature("custom_domain"));
        assert!(!info.has_feature("custom"));
        assert!(!info.has_feature("analytics"));
    }
}
