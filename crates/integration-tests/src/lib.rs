//! Integration tests for Storelane.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storelane-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `domain_linking` - Domain normalization and status semantics
//! - `entitlements` - Limit math and feature gating
//! - `slugs` - Store slug derivation rules
//! - `invoice_flow` - Invoice state machine and billing periods
//! - `checkout_links` - WhatsApp order message and deep-link building
//!
//! The suites exercise library logic directly; tests needing a live
//! database live next to the repositories they cover.
