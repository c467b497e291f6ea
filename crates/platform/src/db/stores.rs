//! Store repository: CRUD, slug allocation, and domain column updates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use storelane_core::{MerchantId, Slug, SlugError, StoreId};

use super::RepositoryError;

/// How many deduplication suffixes to try before giving up on a slug.
const MAX_SLUG_ATTEMPTS: u32 = 20;

/// A merchant storefront row.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct Store {
    pub id: StoreId,
    pub merchant_id: MerchantId,
    pub name: String,
    pub slug: Slug,
    pub theme_primary_color: String,
    pub theme_accent_color: String,
    pub theme_font: String,
    pub currency: String,
    pub delivery_enabled: bool,
    pub delivery_fee: Decimal,
    pub whatsapp_number: String,
    pub order_template: String,
    pub active: bool,
    pub custom_domain: Option<String>,
    pub domain_verified: bool,
    pub domain_status: Option<JsonValue>,
    pub domain_checked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const STORE_COLUMNS: &str = r"
    id, merchant_id, name, slug,
    theme_primary_color, theme_accent_color, theme_font,
    currency, delivery_enabled, delivery_fee, whatsapp_number, order_template,
    active, custom_domain, domain_verified, domain_status, domain_checked_at,
    created_at, updated_at
";

/// Parameters for creating a store.
#[derive(Debug)]
pub struct NewStore {
    pub merchant_id: MerchantId,
    pub name: String,
    pub currency: String,
    pub whatsapp_number: String,
}

/// Theme fields a merchant can customize.
#[derive(Debug, serde::Deserialize)]
pub struct ThemeUpdate {
    pub primary_color: String,
    pub accent_color: String,
    pub font: String,
}

/// Business settings a merchant can edit.
#[derive(Debug, serde::Deserialize)]
pub struct SettingsUpdate {
    pub currency: String,
    pub delivery_enabled: bool,
    pub delivery_fee: Decimal,
    pub whatsapp_number: String,
    pub order_template: String,
}

/// Create a store, deriving a unique slug from the name.
///
/// The `(merchant_id, name)` pair must be unique; the slug is deduplicated
/// with a numeric suffix when another merchant already took it.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` for a duplicate name under the same
/// merchant or an unusable (empty/reserved) name.
pub async fn create_store(pool: &PgPool, params: NewStore) -> Result<Store, RepositoryError> {
    let base = Slug::from_name(&params.name).map_err(slug_conflict)?;

    let mut attempt = 0;
    loop {
        let candidate = if attempt == 0 {
            base.clone()
        } else {
            base.with_suffix(attempt + 1)
        };

        let result = sqlx::query_as::<_, Store>(&format!(
            r"
            INSERT INTO stores (merchant_id, name, slug, currency, whatsapp_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {STORE_COLUMNS}
            "
        ))
        .bind(params.merchant_id)
        .bind(&params.name)
        .bind(&candidate)
        .bind(&params.currency)
        .bind(&params.whatsapp_number)
        .fetch_one(pool)
        .await;

        match result {
            Ok(store) => return Ok(store),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                match db.constraint() {
                    Some("stores_merchant_name_key") => {
                        return Err(RepositoryError::Conflict(
                            "a store with this name already exists".to_string(),
                        ));
                    }
                    Some("stores_slug_key") if attempt < MAX_SLUG_ATTEMPTS => {
                        attempt += 1;
                    }
                    _ => {
                        return Err(RepositoryError::Conflict(format!(
                            "could not allocate a slug for '{}'",
                            params.name
                        )));
                    }
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Fetch a store by id.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_store(pool: &PgPool, store_id: StoreId) -> Result<Option<Store>, RepositoryError> {
    let store = sqlx::query_as::<_, Store>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores WHERE id = $1"
    ))
    .bind(store_id)
    .fetch_optional(pool)
    .await?;

    Ok(store)
}

/// Fetch an active store by slug (public storefront lookup).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_active_store_by_slug(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<Store>, RepositoryError> {
    let store = sqlx::query_as::<_, Store>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores WHERE slug = $1 AND active"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(store)
}

/// List a merchant's stores, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_stores_for_merchant(
    pool: &PgPool,
    merchant_id: MerchantId,
) -> Result<Vec<Store>, RepositoryError> {
    let stores = sqlx::query_as::<_, Store>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores WHERE merchant_id = $1 ORDER BY created_at DESC"
    ))
    .bind(merchant_id)
    .fetch_all(pool)
    .await?;

    Ok(stores)
}

/// Update a store's theme.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the store does not exist.
pub async fn update_theme(
    pool: &PgPool,
    store_id: StoreId,
    theme: ThemeUpdate,
) -> Result<Store, RepositoryError> {
    sqlx::query_as::<_, Store>(&format!(
        r"
        UPDATE stores
        SET theme_primary_color = $2, theme_accent_color = $3, theme_font = $4,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {STORE_COLUMNS}
        "
    ))
    .bind(store_id)
    .bind(&theme.primary_color)
    .bind(&theme.accent_color)
    .bind(&theme.font)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)
}

/// Update a store's business settings.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the store does not exist.
pub async fn update_settings(
    pool: &PgPool,
    store_id: StoreId,
    settings: SettingsUpdate,
) -> Result<Store, RepositoryError> {
    sqlx::query_as::<_, Store>(&format!(
        r"
        UPDATE stores
        SET currency = $2, delivery_enabled = $3, delivery_fee = $4,
            whatsapp_number = $5, order_template = $6, updated_at = NOW()
        WHERE id = $1
        RETURNING {STORE_COLUMNS}
        "
    ))
    .bind(store_id)
    .bind(&settings.currency)
    .bind(settings.delivery_enabled)
    .bind(settings.delivery_fee)
    .bind(&settings.whatsapp_number)
    .bind(&settings.order_template)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)
}

/// Soft-delete (or reactivate) a store via its active flag.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the store does not exist.
pub async fn set_active(
    pool: &PgPool,
    store_id: StoreId,
    active: bool,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("UPDATE stores SET active = $2, updated_at = NOW() WHERE id = $1")
        .bind(store_id)
        .bind(active)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Hard-delete a store. Categories, products, orders, subscriptions, and
/// invoices cascade at the schema level.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the store does not exist.
pub async fn delete_store(pool: &PgPool, store_id: StoreId) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM stores WHERE id = $1")
        .bind(store_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

// =============================================================================
// Domain registration columns
// =============================================================================

/// Find the store currently owning a normalized custom domain.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_domain_owner(
    pool: &PgPool,
    domain: &str,
) -> Result<Option<Store>, RepositoryError> {
    let store = sqlx::query_as::<_, Store>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores WHERE custom_domain = $1"
    ))
    .bind(domain)
    .fetch_optional(pool)
    .await?;

    Ok(store)
}

/// Link a domain uniquely to one store.
///
/// Clears the domain from every other store and sets it on the target in a
/// single transaction, so the partial unique index on `custom_domain` never
/// observes two owners. Last writer wins under concurrency.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the target store does not exist.
pub async fn link_domain(
    pool: &PgPool,
    store_id: StoreId,
    domain: &str,
    verified: bool,
) -> Result<(), RepositoryError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r"
        UPDATE stores
        SET custom_domain = NULL, domain_verified = FALSE, domain_status = NULL,
            domain_checked_at = NULL, updated_at = NOW()
        WHERE custom_domain = $1 AND id <> $2
        ",
    )
    .bind(domain)
    .bind(store_id)
    .execute(&mut *tx)
    .await?;

    let result = sqlx::query(
        r"
        UPDATE stores
        SET custom_domain = $1, domain_verified = $3, updated_at = NOW()
        WHERE id = $2
        ",
    )
    .bind(domain)
    .bind(store_id)
    .bind(verified)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    tx.commit().await?;
    Ok(())
}

/// Clear a store's domain registration columns.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn unlink_domain(pool: &PgPool, store_id: StoreId) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        UPDATE stores
        SET custom_domain = NULL, domain_verified = FALSE, domain_status = NULL,
            domain_checked_at = NULL, updated_at = NOW()
        WHERE id = $1
        ",
    )
    .bind(store_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Write the latest provider status blob onto a store.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn persist_domain_status(
    pool: &PgPool,
    store_id: StoreId,
    verified: bool,
    status: &JsonValue,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        UPDATE stores
        SET domain_verified = $2, domain_status = $3, domain_checked_at = NOW(),
            updated_at = NOW()
        WHERE id = $1
        ",
    )
    .bind(store_id)
    .bind(verified)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(())
}

/// Every store with a configured custom domain (for the scheduled sweep).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn stores_with_custom_domain(pool: &PgPool) -> Result<Vec<Store>, RepositoryError> {
    let stores = sqlx::query_as::<_, Store>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores WHERE custom_domain IS NOT NULL ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(stores)
}

fn slug_conflict(err: SlugError) -> RepositoryError {
    RepositoryError::Conflict(err.to_string())
}

#[cfg(test)]
pub(crate) fn test_store_fixture(whatsapp_number: &str) -> Store {
    Store {
        id: StoreId::new(1),
        merchant_id: MerchantId::new(uuid::Uuid::nil()),
        name: "Demo Store".to_string(),
        slug: Slug::parse("demo-store").unwrap(),
        theme_primary_color: "#1a1a1a".to_string(),
        theme_accent_color: "#e0a458".to_string(),
        theme_font: "Inter".to_string(),
        currency: "USD".to_string(),
        delivery_enabled: false,
        delivery_fee: Decimal::ZERO,
        whatsapp_number: whatsapp_number.to_string(),
        order_template: String::new(),
        active: true,
        custom_domain: None,
        domain_verified: false,
        domain_status: None,
        domain_checked_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn live_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for this test");
        let pool = PgPool::connect(&url).await.expect("connect");
        sqlx::migrate!("./migrations").run(&pool).await.expect("migrate");
        pool
    }

    fn unique_store(name_prefix: &str) -> NewStore {
        NewStore {
            merchant_id: MerchantId::new(uuid::Uuid::new_v4()),
            name: format!("{name_prefix} {}", uuid::Uuid::new_v4()),
            currency: "USD".to_string(),
            whatsapp_number: "+15550001111".to_string(),
        }
    }

    #[tokio::test]
    #[ignore = "needs a live Postgres database via DATABASE_URL"]
    async fn test_relink_leaves_single_owner() {
        let pool = live_pool().await;

        let first = create_store(&pool, unique_store("Relink First")).await.expect("create");
        let second = create_store(&pool, unique_store("Relink Second")).await.expect("create");
        let domain = format!("{}.example.com", uuid::Uuid::new_v4());

        link_domain(&pool, first.id, &domain, true).await.expect("link first");
        link_domain(&pool, second.id, &domain, false).await.expect("relink");

        let owner = find_domain_owner(&pool, &domain)
            .await
            .expect("lookup")
            .expect("domain has an owner");
        assert_eq!(owner.id, second.id);

        let displaced = get_store(&pool, first.id)
            .await
            .expect("lookup")
            .expect("store exists");
        assert!(displaced.custom_domain.is_none());
        assert!(!displaced.domain_verified);
        assert!(displaced.domain_status.is_none());
    }

    #[tokio::test]
    #[ignore = "needs a live Postgres database via DATABASE_URL"]
    async fn test_link_unknown_store_is_not_found() {
        let pool = live_pool().await;

        let err = link_domain(&pool, StoreId::new(i32::MIN), "ghost.example.com", false)
            .await
            .expect_err("no such store");
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
