// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `demo` command.

use std::io::{self, Write};

use anyhow::{ensure, Context};
use tollgate_config::FromConfig;
use tollgate_core::{AuthError, AuthService, HashingParams, TokenConfig};
use tracing::info;

use super::gen_secret::{encode_secret, generate_secret};
use crate::cli::{Cli, DemoArgs, SecretFormat};
use crate::error::BinResult;

/// Executes the `demo` command.
pub fn demo(cli: &Cli, args: &DemoArgs) -> BinResult<()> {
    let auth = if args.use_config {
        let config = tollgate_config::load_config(&cli.config)?;
        AuthService::from_config(&config)?
    } else {
        let secret = encode_secret(&generate_secret(32), SecretFormat::Base64);
        AuthService::builder()
            .token_config(TokenConfig::new(secret))
            .hashing(HashingParams::minimal())
            .build()?
    };

    info!(use_config = args.use_config, "Running demo scenario");
    run_scenario(&auth, &mut io::stdout().lock())?;
    Ok(())
}

/// Walks through registration, role assignment, login, role checks and
/// logout on `auth`, writing each step to `out`. Fails on the first step
/// whose outcome differs from the expected one.
pub fn run_scenario<W: Write>(auth: &AuthService, out: &mut W) -> anyhow::Result<()> {
    auth.register("alice", "pw1").context("register alice")?;
    auth.register("bob", "pw2").context("register bob")?;
    writeln!(out, "registered alice, bob")?;

    auth.create_role("Dev").context("create role Dev")?;
    auth.add_role_to_user("Dev", "alice").context("assign Dev to alice")?;
    writeln!(out, "created role Dev and assigned it to alice")?;

    let token_a = auth.login("alice", "pw1").context("login alice")?;
    writeln!(out, "alice logged in (token A)")?;

    let dev = auth.has_role(&token_a, "Dev")?;
    writeln!(out, "hasRole(A, Dev)   = {}", dev)?;
    ensure!(dev, "alice should hold Dev");

    let admin = auth.has_role(&token_a, "Admin")?;
    writeln!(out, "hasRole(A, Admin) = {}", admin)?;
    ensure!(!admin, "alice should not hold Admin");

    let token_b = auth.login("bob", "pw2").context("login bob")?;
    writeln!(out, "bob logged in (token B)")?;

    let bob_dev = auth.has_role(&token_b, "Dev")?;
    writeln!(out, "hasRole(B, Dev)   = {}", bob_dev)?;
    ensure!(!bob_dev, "bob should not hold Dev");

    auth.logout(&token_a);
    writeln!(out, "alice logged out (token A revoked)")?;

    match auth.has_role(&token_a, "Dev") {
        Err(AuthError::TokenInvalid) => writeln!(out, "hasRole(A, Dev)   -> token invalid")?,
        other => anyhow::bail!("revoked token A should be invalid, got {:?}", other),
    }

    let bob_dev = auth.has_role(&token_b, "Dev")?;
    writeln!(out, "hasRole(B, Dev)   = {} (unaffected)", bob_dev)?;
    ensure!(!bob_dev, "bob should still not hold Dev");

    let wrong = auth.login("bob", "wrong");
    ensure!(
        wrong == Err(AuthError::AuthFailed),
        "login with a wrong password should fail"
    );
    writeln!(out, "login(bob, wrong) -> authentication failed")?;

    let dev_role = auth.role("Dev").context("role Dev should exist")?;
    let users: Vec<_> = auth.registry().usernames().into_iter().map(|u| u.into_inner()).collect();
    let roles: Vec<_> = auth.registry().role_names().into_iter().map(|r| r.into_inner()).collect();
    writeln!(out, "users: {}", users.join(", "))?;
    writeln!(out, "roles: {} (Dev created {})", roles.join(", "), dev_role.created_at.to_rfc3339())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::builder()
            .token_config(TokenConfig::new("VeKcPGNcxYOCVRUDnzoEzwhtYGQddlRu"))
            .hashing(HashingParams::minimal())
            .build()
            .unwrap()
    }

    #[test]
    fn test_scenario_runs() {
        let auth = service();
        let mut out = Vec::new();
        run_scenario(&auth, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("hasRole(A, Dev)   = true"));
        assert!(text.contains("token invalid"));
        assert!(text.contains("users: alice, bob"));
        assert!(text.contains("roles: Dev (Dev created "));
        assert_eq!(auth.revocations().len(), 1);
    }

    #[test]
    fn test_scenario_fails_on_dirty_service() {
        let auth = service();
        auth.register("alice", "other").unwrap();

        let err = run_scenario(&auth, &mut Vec::new()).unwrap_err();
        assert!(format!("{:#}", err).contains("register alice"));
    }

    #[test]
    fn test_demo_with_ephemeral_secret() {
        let cli = <Cli as clap::Parser>::parse_from(["tollgate", "demo"]);
        demo(&cli, &DemoArgs::default()).unwrap();
    }
}
