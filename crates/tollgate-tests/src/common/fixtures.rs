// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Services are built with the cheapest Argon2 parameters and a
//! [`ManualClock`], so expiry and purge behavior is driven explicitly.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::NamedTempFile;
use tollgate_config::ConfigFormat;
use tollgate_core::{AuthService, HashingParams, ManualClock, TokenConfig};

// =============================================================================
// Constants
// =============================================================================

/// Signing secret used by every fixture service.
pub const TEST_SECRET: &str = "VeKcPGNcxYOCVRUDnzoEzwhtYGQddlRu";

/// A second secret, for tokens that must fail signature checks.
pub const OTHER_SECRET: &str = "pQ3v9fJmX2cLw8RtZs7Yk1NbHd4GaE6u";

/// Fixed start instant for manual clocks.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

// =============================================================================
// TestService
// =============================================================================

/// An [`AuthService`] paired with the clock that drives it.
pub struct TestService {
    /// The service under test.
    pub auth: Arc<AuthService>,
    /// The clock the service reads.
    pub clock: Arc<ManualClock>,
}

impl TestService {
    /// Default token validity (2 hours).
    pub fn new() -> Self {
        Self::with_token_config(TokenConfig::new(TEST_SECRET))
    }

    /// Service with a custom token validity.
    pub fn with_validity(validity: Duration) -> Self {
        Self::with_token_config(TokenConfig::new(TEST_SECRET).with_validity(validity))
    }

    /// Service with a custom token configuration.
    pub fn with_token_config(config: TokenConfig) -> Self {
        let clock = Arc::new(ManualClock::at(epoch()));
        let auth = AuthService::builder()
            .token_config(config)
            .hashing(HashingParams::minimal())
            .clock(clock.clone())
            .build()
            .expect("fixture service builds");

        Self {
            auth: Arc::new(auth),
            clock,
        }
    }

    /// Service that purges dead revocation entries on nearly every logout.
    pub fn with_eager_purge(config: TokenConfig) -> Self {
        let clock = Arc::new(ManualClock::at(epoch()));
        let auth = AuthService::builder()
            .token_config(config)
            .hashing(HashingParams::minimal())
            .clock(clock.clone())
            .purge_interval(Duration::from_secs(1))
            .build()
            .expect("fixture service builds");

        Self {
            auth: Arc::new(auth),
            clock,
        }
    }

    /// Moves the service clock forward.
    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    /// Registers alice/pw1 and bob/pw2, creates "Dev" and grants it to alice.
    pub fn seed_users(&self) {
        self.auth.register("alice", "pw1").expect("register alice");
        self.auth.register("bob", "pw2").expect("register bob");
        self.auth.create_role("Dev").expect("create Dev");
        self.auth
            .add_role_to_user("Dev", "alice")
            .expect("assign Dev to alice");
    }

    /// Logs alice in.
    pub fn login_alice(&self) -> String {
        self.auth.login("alice", "pw1").expect("alice logs in")
    }

    /// Logs bob in.
    pub fn login_bob(&self) -> String {
        self.auth.login("bob", "pw2").expect("bob logs in")
    }
}

impl Default for TestService {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Configuration file contents in each supported format.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// A complete YAML configuration.
    pub fn yaml() -> String {
        format!(
            r#"
token:
  secret: "{TEST_SECRET}"
  issuer: tollgate-test
  validity: 30m
  leeway: 5s
  algorithm: HS384
hashing:
  memory_kib: 64
  iterations: 1
  parallelism: 1
revocation:
  ttl: 1h
  purge_interval: 10s
logging:
  level: debug
  format: json
"#
        )
    }

    /// The same configuration as TOML.
    pub fn toml() -> String {
        format!(
            r#"
[token]
secret = "{TEST_SECRET}"
issuer = "tollgate-test"
validity = "30m"
leeway = "5s"
algorithm = "HS384"

[hashing]
memory_kib = 64
iterations = 1
parallelism = 1

[revocation]
ttl = "1h"
purge_interval = "10s"

[logging]
level = "debug"
format = "json"
"#
        )
    }

    /// The same configuration as JSON.
    pub fn json() -> String {
        format!(
            r#"{{
  "token": {{
    "secret": "{TEST_SECRET}",
    "issuer": "tollgate-test",
    "validity": "30m",
    "leeway": "5s",
    "algorithm": "HS384"
  }},
  "hashing": {{ "memory_kib": 64, "iterations": 1, "parallelism": 1 }},
  "revocation": {{ "ttl": "1h", "purge_interval": "10s" }},
  "logging": {{ "level": "debug", "format": "json" }}
}}"#
        )
    }

    /// Contents for `format`.
    pub fn for_format(format: ConfigFormat) -> String {
        match format {
            ConfigFormat::Yaml => Self::yaml(),
            ConfigFormat::Toml => Self::toml(),
            ConfigFormat::Json => Self::json(),
        }
    }

    /// Writes `content` to a temporary file with the format's extension.
    pub fn write(content: &str, format: ConfigFormat) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(format!(".{}", format.extension()))
            .expect("create temp config file");
        file.write_all(content.as_bytes())
            .expect("write temp config file");
        file
    }
}
