//! Tests for entitlement limit math and feature gating.

use storelane_platform::entitlements::{PlanInfo, enforce_limit};

// =============================================================================
// Limit math
// =============================================================================

#[test]
fn test_limit_none_is_unlimited() {
    let check = enforce_limit(1_000, None);
    assert!(check.allowed);
    assert_eq!(check.remaining, None);
}

#[test]
fn test_limit_reached_blocks() {
    // 5 products on a 5-product plan: no headroom left
    let check = enforce_limit(5, Some(5));
    assert!(!check.allowed);
    assert_eq!(check.remaining, Some(0));
}

#[test]
fn test_limit_with_headroom_allows() {
    let check = enforce_limit(3, Some(5));
    assert!(check.allowed);
    assert_eq!(check.remaining, Some(2));
}

#[test]
fn test_limit_overshoot_never_reports_negative() {
    // Concurrent creates can overshoot; remaining clamps at zero
    let check = enforce_limit(7, Some(5));
    assert!(!check.allowed);
    assert_eq!(check.remaining, Some(0));
}

#[test]
fn test_zero_limit_blocks_first_item() {
    let check = enforce_limit(0, Some(0));
    assert!(!check.allowed);
}

// =============================================================================
// Feature gating
// =============================================================================

#[test]
fn test_empty_plan_has_nothing() {
    let info = PlanInfo::none();
    assert!(info.plan_id.is_none());
    assert!(info.plan_name.is_none());
    assert!(!info.has_feature("custom_domain"));
    assert!(!info.has_feature("theme"));
    assert!(!info.has_feature(""));
}

#[test]
fn test_unsubscribed_store_keeps_base_functionality() {
    let info = PlanInfo::none();
    assert_eq!(info.product_limit, None);
    assert_eq!(info.variant_limit, None);
    assert_eq!(info.storage_limit_mb, None);

    let first_product = enforce_limit(0, info.product_limit);
    assert!(first_product.allowed);
}

#[test]
fn test_feature_membership_is_exact() {
    let info = PlanInfo {
        plan_id: None,
        plan_name: Some("growth".to_string()),
        product_limit: Some(250),
        variant_limit: Some(3),
        storage_limit_mb: Some(2_048),
        features: vec!["categories".to_string(), "theme".to_string()],
    };

    assert!(info.has_feature("categories"));
    assert!(info.has_feature("theme"));
    assert!(!info.has_feature("category"));
    assert!(!info.has_feature("custom_domain"));
}

#[test]
fn test_plan_info_serializes_limits_as_nullable() {
    let info = PlanInfo {
        plan_id: None,
        plan_name: Some("pro".to_string()),
        product_limit: None,
        variant_limit: None,
        storage_limit_mb: None,
        features: vec![],
    };

    let value = serde_json::to_value(&info).expect("serializable");
    assert!(value["product_limit"].is_null());
    assert_eq!(value["plan_name"], serde_json::json!("pro"));
}
