// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Concurrency Integration Tests
//!
//! Many threads sharing one service through `Arc`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use tollgate_core::{AuthError, AuthService, TokenState};
use tollgate_tests::prelude::*;

const THREADS: usize = 8;

#[test]
fn test_service_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthService>();
    assert_send_sync::<Arc<AuthService>>();
}

#[test]
fn test_concurrent_register_same_name_single_winner() {
    let t = TestService::new();
    let winners = AtomicUsize::new(0);

    thread::scope(|s| {
        for i in 0..THREADS {
            let auth = &t.auth;
            let winners = &winners;
            s.spawn(move || match auth.register("alice", &format!("pw{}", i)) {
                Ok(()) => {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
                Err(e) => assert_eq!(e, AuthError::user_exists("alice")),
            });
        }
    });

    assert_eq!(winners.load(Ordering::SeqCst), 1);
    assert_eq!(t.auth.registry().user_count(), 1);

    let logins = (0..THREADS)
        .filter(|i| t.auth.login("alice", &format!("pw{}", i)).is_ok())
        .count();
    assert_eq!(logins, 1);
}

#[test]
fn test_concurrent_register_distinct_names() {
    let t = TestService::new();

    thread::scope(|s| {
        for i in 0..THREADS {
            let auth = &t.auth;
            s.spawn(move || {
                for j in 0..4 {
                    auth.register(&format!("user-{}-{}", i, j), "pw").unwrap();
                }
            });
        }
    });

    assert_eq!(t.auth.registry().user_count(), THREADS * 4);
}

#[test]
fn test_concurrent_assign_and_delete_role_leaves_no_dangling_role() {
    let t = TestService::new();
    for i in 0..THREADS {
        t.auth.register(&format!("user-{}", i), "pw").unwrap();
    }

    for _ in 0..20 {
        t.auth.create_role("Dev").unwrap();

        thread::scope(|s| {
            for i in 0..THREADS {
                let auth = &t.auth;
                s.spawn(move || {
                    match auth.add_role_to_user("Dev", &format!("user-{}", i)) {
                        Ok(()) => {}
                        Err(e) => assert_eq!(e, AuthError::role_not_found("Dev")),
                    }
                });
            }
            let auth = &t.auth;
            s.spawn(move || auth.delete_role("Dev").unwrap());
        });

        assert!(!t.auth.registry().role_exists("Dev"));
        for i in 0..THREADS {
            assert!(
                !t.auth.registry().has_role(&format!("user-{}", i), "Dev"),
                "user-{} kept a deleted role",
                i
            );
        }
    }
}

#[test]
fn test_concurrent_logout_same_token() {
    let t = TestService::new();
    t.seed_users();
    let token = t.login_alice();

    thread::scope(|s| {
        for _ in 0..THREADS {
            let auth = &t.auth;
            let token = token.as_str();
            s.spawn(move || auth.logout(token));
        }
    });

    assert_eq!(t.auth.revocations().len(), 1);
    t.auth.assert_state(&token, TokenState::Revoked);
}

#[test]
fn test_concurrent_sessions_are_isolated() {
    let t = TestService::new();
    t.auth.create_role("Dev").unwrap();
    for i in 0..THREADS {
        let name = format!("user-{}", i);
        t.auth.register(&name, "pw").unwrap();
        if i % 2 == 0 {
            t.auth.add_role_to_user("Dev", &name).unwrap();
        }
    }

    thread::scope(|s| {
        for i in 0..THREADS {
            let auth = Arc::clone(&t.auth);
            s.spawn(move || {
                let name = format!("user-{}", i);
                for _ in 0..5 {
                    let token = auth.login(&name, "pw").unwrap();
                    assert_eq!(auth.has_role(&token, "Dev"), Ok(i % 2 == 0));
                    auth.logout(&token);
                    assert_eq!(auth.has_role(&token, "Dev"), Err(AuthError::TokenInvalid));
                }
            });
        }
    });

    assert_eq!(t.auth.revocations().len(), THREADS * 5);
}
