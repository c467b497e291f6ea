//! Plan repository (admin-managed subscription tiers).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use storelane_core::PlanId;

use super::RepositoryError;

/// A subscription tier. Identity (id, name) is immutable once created;
/// limits, prices, features, and the active flag are mutable.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub monthly_price: Decimal,
    pub yearly_price: Decimal,
    /// NULL = unlimited.
    pub product_limit: Option<i32>,
    pub variant_limit: Option<i32>,
    pub storage_limit_mb: Option<i32>,
    pub features: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable plan fields.
#[derive(Debug, serde::Deserialize)]
pub struct PlanInput {
    pub monthly_price: Decimal,
    pub yearly_price: Decimal,
    pub product_limit: Option<i32>,
    pub variant_limit: Option<i32>,
    pub storage_limit_mb: Option<i32>,
    pub features: Vec<String>,
    pub active: bool,
}

const PLAN_COLUMNS: &str = r"
    id, name, monthly_price, yearly_price,
    product_limit, variant_limit, storage_limit_mb,
    features, active, created_at, updated_at
";

/// Create a plan.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` on a duplicate name.
pub async fn create_plan(
    pool: &PgPool,
    name: &str,
    input: PlanInput,
) -> Result<Plan, RepositoryError> {
    let result = sqlx::query_as::<_, Plan>(&format!(
        r"
        INSERT INTO plans (name, monthly_price, yearly_price,
                           product_limit, variant_limit, storage_limit_mb,
                           features, active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {PLAN_COLUMNS}
        "
    ))
    .bind(name)
    .bind(input.monthly_price)
    .bind(input.yearly_price)
    .bind(input.product_limit)
    .bind(input.variant_limit)
    .bind(input.storage_limit_mb)
    .bind(&input.features)
    .bind(input.active)
    .fetch_one(pool)
    .await;

    match result {
        Ok(plan) => Ok(plan),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
            RepositoryError::Conflict(format!("a plan named '{name}' already exists")),
        ),
        Err(e) => Err(e.into()),
    }
}

/// Fetch a plan by id.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_plan(pool: &PgPool, plan_id: PlanId) -> Result<Option<Plan>, RepositoryError> {
    let plan = sqlx::query_as::<_, Plan>(&format!(
        "SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1"
    ))
    .bind(plan_id)
    .fetch_optional(pool)
    .await?;

    Ok(plan)
}

/// List all plans (admin view includes inactive tiers).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_plans(pool: &PgPool, active_only: bool) -> Result<Vec<Plan>, RepositoryError> {
    let plans = sqlx::query_as::<_, Plan>(&format!(
        "SELECT {PLAN_COLUMNS} FROM plans WHERE (NOT $1 OR active) ORDER BY monthly_price"
    ))
    .bind(active_only)
    .fetch_all(pool)
    .await?;

    Ok(plans)
}

/// Update a plan's mutable fields.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the plan does not exist.
pub async fn update_plan(
    pool: &PgPool,
    plan_id: PlanId,
    input: PlanInput,
) -> Result<Plan, RepositoryError> {
    sqlx::query_as::<_, Plan>(&format!(
        r"
        UPDATE plans
        SET monthly_price = $2, yearly_price = $3,
            product_limit = $4, variant_limit = $5, storage_limit_mb = $6,
            features = $7, active = $8, updated_at = NOW()
        WHERE id = $1
        RETURNING {PLAN_COLUMNS}
        "
    ))
    .bind(plan_id)
    .bind(input.monthly_price)
    .bind(input.yearly_price)
    .bind(input.product_limit)
    .bind(input.variant_limit)
    .bind(input.storage_limit_mb)
    .bind(&input.features)
    .bind(input.active)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)
}
