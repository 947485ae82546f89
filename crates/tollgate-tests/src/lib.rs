// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Tollgate Integration Tests
//!
//! Shared fixtures and assertions for the suites under `tests/`.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tollgate-tests
//! cargo test -p tollgate-tests --test integration_sessions
//! cargo test -p tollgate-tests -- --nocapture
//! ```
//!
//! ## Test Categories
//!
//! - `integration_sessions.rs`: the login / role / logout walkthrough and
//!   token lifecycle under a manual clock
//! - `integration_registry.rs`: users, roles, assignments, cascading deletes
//!   and re-registration
//! - `integration_concurrency.rs`: racing registrations, assignments and
//!   logouts across threads
//! - `integration_config.rs`: file formats, environment overrides and
//!   service wiring
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use tollgate_tests::prelude::*;
//!
//! #[test]
//! fn test_something() {
//!     let harness = TestService::new();
//!     harness.seed_users();
//!     let token = harness.login_alice();
//!     harness.auth.assert_has_role(&token, "Dev");
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::{init_test_logging, temp_test_dir};
}
