// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Registry Integration Tests
//!
//! Users, roles and assignments as seen through the service facade.
//!
//! ## Test Categories
//!
//! - `test_user_*`: registration and deletion
//! - `test_role_*`: role lifecycle and cascading deletes
//! - `test_assign_*`: assignment edges
//! - `test_deleted_user_*`: tokens whose user is gone or re-registered

use std::time::Duration;

use tollgate_core::{AuthError, EntityKind, TokenState};
use tollgate_tests::prelude::*;

// =============================================================================
// Users
// =============================================================================

#[test]
fn test_user_register_duplicate() {
    let t = TestService::new();
    t.auth.register("alice", "pw1").unwrap();

    let err = t.auth.register("alice", "other").unwrap_err();
    assert_eq!(
        err,
        AuthError::AlreadyExists {
            kind: EntityKind::User,
            name: "alice".to_string()
        }
    );
    assert_eq!(err.error_code(), "ALREADY_EXISTS");

    // The original password still works.
    t.auth.login("alice", "pw1").unwrap();
    assert_eq!(t.auth.login("alice", "other"), Err(AuthError::AuthFailed));
}

#[test]
fn test_user_register_blank_input() {
    let t = TestService::new();

    for (username, password) in [("", "pw"), ("   ", "pw"), ("carol", ""), ("carol", " \t")] {
        let err = t.auth.register(username, password).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT", "{:?}/{:?}", username, password);
    }
    assert!(t.auth.user("carol").is_none());
}

#[test]
fn test_user_delete() {
    let t = TestService::new();
    t.seed_users();

    t.auth.delete_user("bob").unwrap();
    assert!(t.auth.user("bob").is_none());
    assert_eq!(t.auth.login("bob", "pw2"), Err(AuthError::AuthFailed));

    let err = t.auth.delete_user("bob").unwrap_err();
    assert_eq!(err, AuthError::user_not_found("bob"));
}

#[test]
fn test_user_snapshot() {
    let t = TestService::new();
    t.seed_users();

    let alice = t.auth.user("alice").unwrap();
    assert_eq!(alice.username.as_str(), "alice");
    assert!(alice.has_role("Dev"));
    assert_eq!(alice.registered_at, epoch());
}

// =============================================================================
// Roles
// =============================================================================

#[test]
fn test_role_create_duplicate_and_blank() {
    let t = TestService::new();
    t.auth.create_role("Dev").unwrap();

    assert_eq!(
        t.auth.create_role("Dev"),
        Err(AuthError::AlreadyExists {
            kind: EntityKind::Role,
            name: "Dev".to_string()
        })
    );
    assert_eq!(t.auth.create_role(" ").unwrap_err().error_code(), "INVALID_INPUT");
}

#[test]
fn test_role_names_are_case_sensitive() {
    let t = TestService::new();
    t.seed_users();
    t.auth.create_role("dev").unwrap();

    let token = t.login_alice();
    t.auth.assert_has_role(&token, "Dev");
    t.auth.assert_lacks_role(&token, "dev");
}

#[test]
fn test_role_delete_cascades() {
    let t = TestService::new();
    t.seed_users();
    t.auth.add_role_to_user("Dev", "bob").unwrap();
    let token_a = t.login_alice();
    let token_b = t.login_bob();

    t.auth.delete_role("Dev").unwrap();

    t.auth.assert_roles(&token_a, &[]);
    t.auth.assert_roles(&token_b, &[]);
    assert!(!t.auth.registry().role_exists("Dev"));

    // Re-creating the role does not bring old assignments back.
    t.auth.create_role("Dev").unwrap();
    t.auth.assert_lacks_role(&token_a, "Dev");
}

#[test]
fn test_role_delete_missing() {
    let t = TestService::new();
    assert_eq!(
        t.auth.delete_role("Ghost"),
        Err(AuthError::role_not_found("Ghost"))
    );
}

// =============================================================================
// Assignments
// =============================================================================

#[test]
fn test_assign_missing_role_or_user() {
    let t = TestService::new();
    t.seed_users();

    assert_eq!(
        t.auth.add_role_to_user("Admin", "alice"),
        Err(AuthError::role_not_found("Admin"))
    );
    assert_eq!(
        t.auth.add_role_to_user("Dev", "mallory"),
        Err(AuthError::user_not_found("mallory"))
    );
}

#[test]
fn test_assign_is_idempotent() {
    let t = TestService::new();
    t.seed_users();

    t.auth.add_role_to_user("Dev", "alice").unwrap();
    t.auth.add_role_to_user("Dev", "alice").unwrap();

    let token = t.login_alice();
    t.auth.assert_roles(&token, &["Dev"]);
}

#[test]
fn test_assign_remove() {
    let t = TestService::new();
    t.seed_users();
    let token = t.login_alice();

    t.auth.remove_role_from_user("Dev", "alice").unwrap();
    t.auth.assert_roles(&token, &[]);

    // Removing a role the user does not hold is fine; a missing user is not.
    t.auth.remove_role_from_user("Dev", "alice").unwrap();
    t.auth.remove_role_from_user("Nope", "alice").unwrap();
    assert_eq!(
        t.auth.remove_role_from_user("Dev", "mallory"),
        Err(AuthError::user_not_found("mallory"))
    );
}

// =============================================================================
// Deleted and re-registered users
// =============================================================================

#[test]
fn test_deleted_user_token() {
    init_test_logging();
    let t = TestService::new();
    t.seed_users();
    let token = t.login_alice();

    t.auth.delete_user("alice").unwrap();

    t.auth.assert_lacks_role(&token, "Dev");
    assert_eq!(t.auth.my_roles(&token), Err(AuthError::TokenInvalid));
    t.auth.assert_state(&token, TokenState::Invalid);
}

#[test]
fn test_deleted_user_logout_still_revokes() {
    let t = TestService::new();
    t.seed_users();
    let token = t.login_alice();

    t.auth.delete_user("alice").unwrap();
    t.auth.logout(&token);

    assert!(t.auth.revocations().is_revoked(&token));
    t.auth.assert_rejected(&token, AuthError::TokenInvalid);
}

#[test]
fn test_deleted_user_reregistered_orphans_old_tokens() {
    let t = TestService::new();
    t.seed_users();
    let old = t.login_alice();

    t.advance(Duration::from_secs(1));
    t.auth.delete_user("alice").unwrap();
    t.auth.register("alice", "new-password").unwrap();
    t.auth.add_role_to_user("Dev", "alice").unwrap();

    t.auth.assert_lacks_role(&old, "Dev");
    assert_eq!(t.auth.my_roles(&old), Err(AuthError::TokenInvalid));
    t.auth.assert_state(&old, TokenState::Invalid);

    let new = t.auth.login("alice", "new-password").unwrap();
    t.auth.assert_has_role(&new, "Dev");
    assert_eq!(t.auth.login("alice", "pw1"), Err(AuthError::AuthFailed));
}
