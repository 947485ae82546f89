// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Session assertions for [`AuthService`] with failure messages that name
//! the token state and role involved.

use std::collections::BTreeSet;

use tollgate_core::{AuthError, AuthService, TokenState};

/// Assertion extensions for [`AuthService`].
pub trait SessionAssertions {
    /// Assert that the token's user holds `role`.
    fn assert_has_role(&self, token: &str, role: &str);

    /// Assert that the token is accepted and its user lacks `role`.
    fn assert_lacks_role(&self, token: &str, role: &str);

    /// Assert that a role check with the token fails with `expected`.
    fn assert_rejected(&self, token: &str, expected: AuthError);

    /// Assert the token's classification.
    fn assert_state(&self, token: &str, expected: TokenState);

    /// Assert the exact role set of the token's user.
    fn assert_roles(&self, token: &str, expected: &[&str]);
}

impl SessionAssertions for AuthService {
    fn assert_has_role(&self, token: &str, role: &str) {
        match self.has_role(token, role) {
            Ok(true) => {}
            other => panic!(
                "Expected token ({}) to hold role {:?}, got {:?}",
                self.inspect(token),
                role,
                other
            ),
        }
    }

    fn assert_lacks_role(&self, token: &str, role: &str) {
        match self.has_role(token, role) {
            Ok(false) => {}
            other => panic!(
                "Expected token ({}) to lack role {:?}, got {:?}",
                self.inspect(token),
                role,
                other
            ),
        }
    }

    fn assert_rejected(&self, token: &str, expected: AuthError) {
        match self.has_role(token, "any") {
            Err(e) if e == expected => {}
            other => panic!(
                "Expected token ({}) to be rejected with {:?}, got {:?}",
                self.inspect(token),
                expected,
                other
            ),
        }
    }

    fn assert_state(&self, token: &str, expected: TokenState) {
        let actual = self.inspect(token);
        assert_eq!(
            actual, expected,
            "Expected token state {}, but got {}",
            expected, actual
        );
    }

    fn assert_roles(&self, token: &str, expected: &[&str]) {
        let expected: BTreeSet<String> = expected.iter().map(|r| r.to_string()).collect();
        match self.my_roles(token) {
            Ok(actual) => assert_eq!(actual, expected, "Role set mismatch"),
            Err(e) => panic!(
                "Expected roles {:?}, but my_roles failed with {:?}",
                expected, e
            ),
        }
    }
}
