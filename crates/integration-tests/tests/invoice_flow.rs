//! Tests for the invoice state machine and billing periods.

use storelane_core::{InvoiceStatus, SubscriptionPeriod};

// =============================================================================
// State machine
// =============================================================================

#[test]
fn test_pending_can_be_reviewed_or_resolved() {
    assert!(InvoiceStatus::Pending.can_transition_to(InvoiceStatus::UnderReview));
    assert!(InvoiceStatus::Pending.can_transition_to(InvoiceStatus::Approved));
    assert!(InvoiceStatus::Pending.can_transition_to(InvoiceStatus::Rejected));
}

#[test]
fn test_under_review_can_only_resolve() {
    assert!(InvoiceStatus::UnderReview.can_transition_to(InvoiceStatus::Approved));
    assert!(InvoiceStatus::UnderReview.can_transition_to(InvoiceStatus::Rejected));
    assert!(!InvoiceStatus::UnderReview.can_transition_to(InvoiceStatus::Pending));
    assert!(!InvoiceStatus::UnderReview.can_transition_to(InvoiceStatus::UnderReview));
}

#[test]
fn test_resolved_invoices_are_terminal() {
    for terminal in [InvoiceStatus::Approved, InvoiceStatus::Rejected] {
        assert!(terminal.is_terminal());
        for target in [
            InvoiceStatus::Pending,
            InvoiceStatus::UnderReview,
            InvoiceStatus::Approved,
            InvoiceStatus::Rejected,
        ] {
            assert!(
                !terminal.can_transition_to(target),
                "{terminal:?} -> {target:?} must be rejected"
            );
        }
    }
}

#[test]
fn test_open_states_are_not_terminal() {
    assert!(!InvoiceStatus::Pending.is_terminal());
    assert!(!InvoiceStatus::UnderReview.is_terminal());
}

// =============================================================================
// Billing periods
// =============================================================================

#[test]
fn test_period_lengths() {
    assert_eq!(SubscriptionPeriod::Monthly.days(), 30);
    assert_eq!(SubscriptionPeriod::Yearly.days(), 365);
}

#[test]
fn test_period_round_trips_through_strings() {
    for period in [SubscriptionPeriod::Monthly, SubscriptionPeriod::Yearly] {
        let parsed: SubscriptionPeriod = period.to_string().parse().expect("parseable");
        assert_eq!(parsed, period);
    }
    assert!("weekly".parse::<SubscriptionPeriod>().is_err());
}
