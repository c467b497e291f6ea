//! Hardcoded plan-name entitlement table.
//!
//! Backend for deployments that manage billing out of band: the subscription
//! row still names the plan, but limits and features come from this table
//! instead of the plan columns.

use storelane_core::features;

use super::PlanInfo;

/// Look up a plan's entitlements by name. `None` when the name is unknown.
pub fn lookup(plan_name: &str) -> Option<PlanInfo> {
    let (product_limit, variant_limit, storage_limit_mb, features): (
        Option<i64>,
        Option<i64>,
        Option<i64>,
        Vec<&str>,
    ) = match plan_name {
        "starter" => (Some(25), Some(0), Some(256), vec![]),
        "growth" => (
            Some(250),
            Some(3),
            Some(2_048),
            vec![features::CATEGORIES, features::THEME, features::DELIVERY_RULES],
        ),
        "pro" => (
            None,
            None,
            None,
            vec![
                features::CATEGORIES,
                features::THEME,
                features::DELIVERY_RULES,
                features::ANALYTICS,
                features::VARIANTS,
                features::CUSTOM_DOMAIN,
            ],
        ),
        _ => return None,
    };

    Some(PlanInfo {
        plan_id: None,
        plan_name: Some(plan_name.to_string()),
        product_limit,
        variant_limit,
        storage_limit_mb,
        features: features.into_iter().map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_plans_resolve() {
        let starter = lookup("starter").unwrap();
        assert_eq!(starter.product_limit, Some(25));
        assert!(!starter.has_feature(features::CUSTOM_DOMAIN));

        let pro = lookup("pro").unwrap();
        assert!(pro.product_limit.is_none());
        assert!(pro.has_feature(features::CUSTOM_DOMAIN));
    }

    #[test]
    fn test_unknown_plan_is_none() {
        assert!(lookup("enterprise").is_none());
    }
}
