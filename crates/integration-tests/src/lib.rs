//! Integration tests for Dandeline.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dandeline-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_reconciliation` - session-to-order mapping and idempotency
//!   invariants
//! - `catalog_import` - skip/force policy, field preservation, price
//!   reconciliation mapping
//! - `lifecycle_events` - notification content for entity lifecycle events
//!
//! Tests exercise the server crate's library surface in-process; no live
//! database or Stripe account is required.
