//! Status enums for subscriptions, invoices, orders, and domain links.

use serde::{Deserialize, Serialize};

/// Billing period for a subscription or invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "subscription_period", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPeriod {
    Monthly,
    Yearly,
}

impl SubscriptionPeriod {
    /// Number of days the period covers (used to compute `ends_at`).
    #[must_use]
    pub const fn days(self) -> i64 {
        match self {
            Self::Monthly => 30,
            Self::Yearly => 365,
        }
    }
}

impl std::fmt::Display for SubscriptionPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl std::str::FromStr for SubscriptionPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("invalid subscription period: {s}")),
        }
    }
}

/// Lifecycle of a merchant-submitted payment reference.
///
/// `pending → under_review → approved | rejected`. Approval is an admin
/// side-effect that inserts a subscription row; rejection records a reason.
/// There is no automatic reconciliation - every transition is human-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "invoice_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl InvoiceStatus {
    /// Whether a transition from `self` to `next` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::UnderReview)
                | (Self::Pending | Self::UnderReview, Self::Approved | Self::Rejected)
        )
    }

    /// Terminal states accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::UnderReview => write!(f, "under_review"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Order fulfillment status as tracked by the merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Received,
    Confirmed,
    Delivered,
    Cancelled,
}

/// State of a custom-domain link for a store.
///
/// `unlinked → pending → verified`; any state returns to `unlinked` on
/// remove. Errors never transition state - the prior state stays untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DomainLinkState {
    #[default]
    Unlinked,
    Pending,
    Verified,
}

impl DomainLinkState {
    /// Derive the link state from the store's domain columns.
    #[must_use]
    pub const fn from_columns(has_domain: bool, verified: bool) -> Self {
        match (has_domain, verified) {
            (false, _) => Self::Unlinked,
            (true, false) => Self::Pending,
            (true, true) => Self::Verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_transitions() {
        use InvoiceStatus::{Approved, Pending, Rejected, UnderReview};

        assert!(Pending.can_transition_to(UnderReview));
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(UnderReview.can_transition_to(Approved));
        assert!(UnderReview.can_transition_to(Rejected));

        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!UnderReview.can_transition_to(Pending));
        assert!(!Approved.can_transition_to(Pending));
    }

    #[test]
    fn test_invoice_terminal_states() {
        assert!(InvoiceStatus::Approved.is_terminal());
        assert!(InvoiceStatus::Rejected.is_terminal());
        assert!(!InvoiceStatus::Pending.is_terminal());
        assert!(!InvoiceStatus::UnderReview.is_terminal());
    }

    #[test]
    fn test_period_days() {
        assert_eq!(SubscriptionPeriod::Monthly.days(), 30);
        assert_eq!(SubscriptionPeriod::Yearly.days(), 365);
    }

    #[test]
    fn test_domain_link_state_from_columns() {
        assert_eq!(DomainLinkState::from_columns(false, false), DomainLinkState::Unlinked);
        assert_eq!(DomainLinkState::from_columns(false, true), DomainLinkState::Unlinked);
        assert_eq!(DomainLinkState::from_columns(true, false), DomainLinkState::Pending);
        assert_eq!(DomainLinkState::from_columns(true, true), DomainLinkState::Verified);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&InvoiceStatus::UnderReview).expect("serialize");
        assert_eq!(json, "\"under_review\"");
        let period: SubscriptionPeriod = serde_json::from_str("\"yearly\"").expect("deserialize");
        assert_eq!(period, SubscriptionPeriod::Yearly);
    }
}
