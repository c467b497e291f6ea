//! Reference-data seeding.

use rust_decimal::Decimal;

use storelane_core::features;
use storelane_platform::db::RepositoryError;
use storelane_platform::db::plans::{self, PlanInput};

use super::CommandError;

/// Insert the default plan tiers. Existing names are left untouched.
///
/// # Errors
///
/// Returns an error when the database is unreachable.
pub async fn plans() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    for (name, input) in default_plans() {
        match plans::create_plan(&pool, name, input).await {
            Ok(plan) => tracing::info!(plan_id = %plan.id, name, "Plan created"),
            Err(RepositoryError::Conflict(_)) => {
                tracing::info!(name, "Plan already exists, skipping");
            }
            Err(RepositoryError::Database(e)) => return Err(e.into()),
            Err(e) => {
                return Err(CommandError::Aborted(format!("seeding {name} failed: {e}")));
            }
        }
    }

    Ok(())
}

fn default_plans() -> Vec<(&'static str, PlanInput)> {
    vec![
        (
            "starter",
            PlanInput {
                monthly_price: Decimal::new(900, 2),
                yearly_price: Decimal::new(9000, 2),
                product_limit: Some(25),
                variant_limit: Some(0),
                storage_limit_mb: Some(256),
                features: vec![],
                active: true,
            },
        ),
        (
            "growth",
            PlanInput {
                monthly_price: Decimal::new(2900, 2),
                yearly_price: Decimal::new(29000, 2),
                product_limit: Some(250),
                variant_limit: Some(3),
                storage_limit_mb: Some(2_048),
                features: feature_keys(&[
                    features::CATEGORIES,
                    features::THEME,
                    features::DELIVERY_RULES,
                ]),
                active: true,
            },
        ),
        (
            "pro",
            PlanInput {
                monthly_price: Decimal::new(7900, 2),
                yearly_price: Decimal::new(79000, 2),
                product_limit: None,
                variant_limit: None,
                storage_limit_mb: None,
                features: feature_keys(&[
                    features::CATEGORIES,
                    features::THEME,
                    features::DELIVERY_RULES,
                    features::ANALYTICS,
                    features::VARIANTS,
                    features::CUSTOM_DOMAIN,
                ]),
                active: true,
            },
        ),
    ]
}

fn feature_keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| (*k).to_string()).collect()
}
