//! Feature-flag keys unlocked by subscription plans.

/// Well-known feature keys.
///
/// Plans store features as free-form strings so new flags can ship without a
/// migration; these constants are the keys the platform itself gates on.
pub mod features {
    /// Category management in the merchant dashboard.
    pub const CATEGORIES: &str = "categories";
    /// Storefront theme customization (colors, font).
    pub const THEME: &str = "theme";
    /// Order analytics dashboard.
    pub const ANALYTICS: &str = "analytics";
    /// Custom-domain linking.
    pub const CUSTOM_DOMAIN: &str = "custom_domain";
    /// Product variants.
    pub const VARIANTS: &str = "variants";
    /// Delivery rules (fees, zones).
    pub const DELIVERY_RULES: &str = "delivery_rules";
}
