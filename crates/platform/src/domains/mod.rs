//! Custom-domain ownership registrar.
//!
//! Keeps the hosting provider's project-domain registration in sync with
//! exactly one store's domain columns, and mirrors verification status.
//!
//! Link state for a domain: `unlinked → pending (added, not verified) →
//! verified`; any state returns to `unlinked` on remove. Provider errors
//! never transition state - the prior state stays untouched.

use serde::Serialize;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use storelane_core::{DomainLinkState, StoreId};

use crate::db::{self, audit, stores};
use crate::db::stores::Store;
use crate::error::AppError;
use crate::vercel::{DomainInfo, VercelClient, VercelError, VerificationChallenge};

/// Advisory lock key serializing the scheduled sweep across invocations.
const DOMAIN_SWEEP_LOCK_KEY: i64 = 0x5374_6f72_654c_6e31;

/// Fixed DNS recipe shown while a domain is unverified.
pub const DNS_INSTRUCTIONS: &str = "Point your apex domain at the platform with an A record \
     to 76.76.21.21, and point www at cname.vercel-dns.com with a CNAME record. \
     DNS changes can take up to an hour to propagate.";

/// Classify an advisory-unlock result. `None` means the lock was released;
/// anything else is the reason to report.
fn unlock_failure(released: Result<bool, sqlx::Error>) -> Option<String> {
    match released {
        Ok(true) => None,
        Ok(false) => Some("advisory lock was not held at release time".to_string()),
        Err(e) => Some(format!("failed to release advisory lock: {e}")),
    }
}

/// Normalize a user-entered domain.
///
/// Strips the scheme, any path and trailing slash, a leading `www.`, and
/// lowercases. Idempotent: `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize_domain(input: &str) -> String {
    let mut s = input.trim().to_lowercase();

    if let Some(idx) = s.find("://") {
        s = s[idx + 3..].to_string();
    }
    if let Some(idx) = s.find('/') {
        s.truncate(idx);
    }
    if let Some(stripped) = s.strip_prefix("www.") {
        s = stripped.to_string();
    }
    s.trim_matches('.').to_string()
}

/// Registration and verification state reported to callers.
#[derive(Debug, Clone, Serialize)]
pub struct DomainStatusReport {
    pub domain: String,
    pub state: DomainLinkState,
    pub verified: bool,
    pub needs_dns: bool,
    /// Human-readable DNS recipe, present while unverified.
    pub instructions: Option<String>,
    pub verification: Vec<VerificationChallenge>,
}

impl DomainStatusReport {
    fn from_provider(domain: String, info: &DomainInfo, misconfigured: bool) -> Self {
        let verified = info.verified && !misconfigured;
        Self {
            domain,
            state: DomainLinkState::from_columns(true, verified),
            verified,
            needs_dns: !verified,
            instructions: (!verified).then(|| DNS_INSTRUCTIONS.to_string()),
            verification: info.verification.clone(),
        }
    }

    fn status_blob(&self) -> JsonValue {
        serde_json::json!({
            "state": self.state,
            "verified": self.verified,
            "needs_dns": self.needs_dns,
            "verification": self.verification,
        })
    }
}

/// Outcome of one scheduled sweep invocation.
#[derive(Debug)]
pub enum SweepOutcome {
    /// Another invocation holds the sweep lock.
    Skipped,
    /// The sweep ran to completion (individual stores may have failed).
    Completed {
        count: usize,
        results: Vec<SweepResult>,
    },
}

/// Per-store result of a sweep run.
#[derive(Debug, Serialize)]
pub struct SweepResult {
    pub store_id: StoreId,
    pub domain: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Registrar tying the provider client to the store domain columns.
#[derive(Clone)]
pub struct DomainRegistrar {
    pool: PgPool,
    client: VercelClient,
}

impl DomainRegistrar {
    /// Create a registrar over an existing pool and provider client.
    #[must_use]
    pub const fn new(pool: PgPool, client: VercelClient) -> Self {
        Self { pool, client }
    }

    /// Connect a domain to a store: add it to the hosting project, read back
    /// status, link it uniquely to the store, and persist the status blob.
    ///
    /// A provider "already exists" response is folded into the success path.
    ///
    /// # Errors
    ///
    /// Returns provider errors (echoing the provider's status) or database
    /// errors. An unverified domain is not an error.
    pub async fn connect(
        &self,
        store_id: StoreId,
        raw_domain: &str,
    ) -> Result<DomainStatusReport, AppError> {
        let domain = normalize_domain(raw_domain);
        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(format!(
                "'{raw_domain}' is not a valid domain"
            )));
        }

        self.client.add_domain(&domain).await?;
        let report = self.check(&domain).await?;

        stores::link_domain(&self.pool, store_id, &domain, report.verified).await?;
        stores::persist_domain_status(&self.pool, store_id, report.verified, &report.status_blob())
            .await?;

        tracing::info!(%store_id, domain, verified = report.verified, "Domain connected");
        Ok(report)
    }

    /// Read current provider status for a domain, without persisting.
    ///
    /// # Errors
    ///
    /// Returns provider errors.
    pub async fn check(&self, domain: &str) -> Result<DomainStatusReport, AppError> {
        let info = self.client.get_domain(domain).await?;
        // A missing config record just means nothing resolves yet
        let misconfigured = match self.client.domain_config(domain).await {
            Ok(config) => config.misconfigured,
            Err(VercelError::Api { status: 404, .. }) => true,
            Err(e) => return Err(e.into()),
        };

        Ok(DomainStatusReport::from_provider(
            domain.to_string(),
            &info,
            misconfigured,
        ))
    }

    /// Re-check and persist status for the current owner of a domain.
    ///
    /// A no-op returning `None` when no store owns the domain.
    ///
    /// # Errors
    ///
    /// Returns provider or database errors.
    pub async fn refresh(&self, domain: &str) -> Result<Option<DomainStatusReport>, AppError> {
        let normalized = normalize_domain(domain);
        let Some(owner) = stores::find_domain_owner(&self.pool, &normalized).await? else {
            return Ok(None);
        };

        let report = self.check(&normalized).await?;
        stores::persist_domain_status(
            &self.pool,
            owner.id,
            report.verified,
            &report.status_blob(),
        )
        .await?;

        Ok(Some(report))
    }

    /// Detach a store's domain from the hosting project and unlink it.
    ///
    /// # Errors
    ///
    /// Returns provider or database errors; the link survives a provider
    /// failure so a later retry can complete the removal.
    pub async fn disconnect(&self, store: &Store) -> Result<(), AppError> {
        let Some(domain) = &store.custom_domain else {
            return Ok(());
        };

        match self.client.remove_domain(domain).await {
            Ok(()) | Err(VercelError::Api { status: 404, .. }) => {}
            Err(e) => return Err(e.into()),
        }

        stores::unlink_domain(&self.pool, store.id).await?;
        tracing::info!(store_id = %store.id, domain, "Domain disconnected");
        Ok(())
    }

    /// Scheduled sweep: re-check every store with a configured domain.
    ///
    /// One store's failure is recorded in the audit log and does not abort
    /// the sweep. A Postgres advisory lock guards against overlapping runs;
    /// a second invocation returns `SweepOutcome::Skipped` immediately.
    ///
    /// # Errors
    ///
    /// Returns database errors from the lock or the store listing; per-store
    /// provider errors are captured in the results instead.
    pub async fn refresh_all(&self) -> Result<SweepOutcome, AppError> {
        let mut lock_conn = self.pool.acquire().await.map_err(db::RepositoryError::from)?;

        let acquired: bool = sqlx::query_scalar("SELECT pg_try_advisory_lock($1)")
            .bind(DOMAIN_SWEEP_LOCK_KEY)
            .fetch_one(&mut *lock_conn)
            .await
            .map_err(db::RepositoryError::from)?;

        if !acquired {
            tracing::info!("Domain sweep already running, skipping");
            return Ok(SweepOutcome::Skipped);
        }

        let outcome = self.run_sweep().await;

        // Release even when the sweep failed partway. A failed unlock leaves
        // the session holding the lock and every later run reports skipped.
        let released: Result<bool, sqlx::Error> = sqlx::query_scalar("SELECT pg_advisory_unlock($1)")
            .bind(DOMAIN_SWEEP_LOCK_KEY)
            .fetch_one(&mut *lock_conn)
            .await;
        if let Some(reason) = unlock_failure(released) {
            tracing::error!(%reason, "Domain sweep lock release failed");
        }

        outcome
    }

    async fn run_sweep(&self) -> Result<SweepOutcome, AppError> {
        let targets = stores::stores_with_custom_domain(&self.pool).await?;
        let mut results = Vec::with_capacity(targets.len());

        for store in &targets {
            let Some(domain) = store.custom_domain.clone() else {
                continue;
            };
            let result = self.sweep_one(store, &domain).await;
            results.push(result);
        }

        let count = results.len();
        tracing::info!(count, "Domain sweep complete");
        Ok(SweepOutcome::Completed { count, results })
    }

    async fn sweep_one(&self, store: &Store, domain: &str) -> SweepResult {
        match self.check(domain).await {
            Ok(report) => {
                let persisted = stores::persist_domain_status(
                    &self.pool,
                    store.id,
                    report.verified,
                    &report.status_blob(),
                )
                .await;

                let (ok, error) = match persisted {
                    Ok(()) => (true, None),
                    Err(e) => (false, Some(e.to_string())),
                };

                self.audit(store.id, domain, ok, Some(report.verified), error.as_deref())
                    .await;
                SweepResult {
                    store_id: store.id,
                    domain: domain.to_string(),
                    ok,
                    verified: Some(report.verified),
                    error,
                }
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(store_id = %store.id, domain, error = %message, "Domain status check failed");
                self.audit(store.id, domain, false, None, Some(&message)).await;
                SweepResult {
                    store_id: store.id,
                    domain: domain.to_string(),
                    ok: false,
                    verified: None,
                    error: Some(message),
                }
            }
        }
    }

    async fn audit(
        &self,
        store_id: StoreId,
        domain: &str,
        ok: bool,
        verified: Option<bool>,
        error: Option<&str>,
    ) {
        if let Err(e) =
            audit::record_domain_check(&self.pool, store_id, domain, ok, verified, error).await
        {
            tracing::error!(%store_id, domain, error = %e, "Failed to record domain check");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_scheme_and_slash() {
        assert_eq!(normalize_domain("https://Shop.Example.com/"), "shop.example.com");
        assert_eq!(normalize_domain("http://shop.example.com"), "shop.example.com");
        assert_eq!(normalize_domain("shop.example.com/checkout"), "shop.example.com");
    }

    #[test]
    fn test_normalize_strips_www() {
        assert_eq!(normalize_domain("www.example.com"), "example.com");
        assert_eq!(normalize_domain("https://WWW.Example.COM/"), "example.com");
    }

    #[test]
    fn test_normalize_idempotent() {
        for input in [
            "https://Shop.Example.com/",
            "www.example.com",
            "  HTTP://www.Foo.Bar/path/",
            "plain.example",
            "",
        ] {
            let once = normalize_domain(input);
            assert_eq!(normalize_domain(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_report_unverified_carries_instructions() {
        let info = DomainInfo {
            name: "shop.example.com".to_string(),
            apex_name: Some("example.com".to_string()),
            verified: false,
            verification: Vec::new(),
        };
        let report =
            DomainStatusReport::from_provider("shop.example.com".to_string(), &info, true);
        assert!(!report.verified);
        assert!(report.needs_dns);
        assert_eq!(report.instructions.as_deref(), Some(DNS_INSTRUCTIONS));
    }

    #[test]
    fn test_report_verified_needs_correct_dns() {
        let info = DomainInfo {
            name: "shop.example.com".to_string(),
            apex_name: None,
            verified: true,
            verification: Vec::new(),
        };

        // Provider says verified, but DNS is misconfigured: still pending
        let pending =
            DomainStatusReport::from_provider("shop.example.com".to_string(), &info, true);
        assert!(!pending.verified);
        assert_eq!(pending.state, DomainLinkState::Pending);

        let done = DomainStatusReport::from_provider("shop.example.com".to_string(), &info, false);
        assert!(done.verified);
        assert!(!done.needs_dns);
        assert!(done.instructions.is_none());
        assert_eq!(done.state, DomainLinkState::Verified);
    }

    #[test]
    fn test_unlock_release_outcomes() {
        assert!(unlock_failure(Ok(true)).is_none());

        let not_held = unlock_failure(Ok(false)).unwrap();
        assert!(not_held.contains("not held"));

        let failed = unlock_failure(Err(sqlx::Error::PoolTimedOut)).unwrap();
        assert!(failed.contains("failed to release"));
    }

    #[test]
    fn test_status_blob_shape() {
        let info = DomainInfo {
            name: "shop.example.com".to_string(),
            apex_name: None,
            verified: true,
            verification: Vec::new(),
        };
        let report = DomainStatusReport::from_provider("shop.example.com".to_string(), &info, false);
        let blob = report.status_blob();
        assert_eq!(blob["state"], serde_json::json!("verified"));
        assert_eq!(blob["verified"], serde_json::json!(true));
        assert_eq!(blob["needs_dns"], serde_json::json!(false));
    }
}
