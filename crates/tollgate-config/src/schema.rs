// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions for Tollgate.
//!
//! # Schema Structure
//!
//! ```text
//! TollgateConfig
//! ├── token: TokenSettings
//! ├── hashing: HashingSettings
//! ├── revocation: RevocationSettings
//! └── logging: LoggingConfig
//! ```
//!
//! Durations are written in humantime notation (`2h`, `90s`, `1m 30s`).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tollgate_core::{token::RECOMMENDED_SECRET_LEN, Algorithm, HashingParams, TokenConfig};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Default token validity (2 hours).
pub const DEFAULT_TOKEN_VALIDITY: Duration = Duration::from_secs(2 * 3600);

/// Default token issuer.
pub const DEFAULT_ISSUER: &str = "tollgate";

/// Default Argon2 memory cost in KiB (19 MiB).
pub const DEFAULT_MEMORY_KIB: u32 = 19 * 1024;

/// Default Argon2 iterations.
pub const DEFAULT_ITERATIONS: u32 = 2;

/// Default Argon2 parallelism.
pub const DEFAULT_PARALLELISM: u32 = 1;

/// Minimum Argon2 memory cost in KiB per lane.
pub const MIN_MEMORY_KIB_PER_LANE: u32 = 8;

/// Maximum Argon2 memory cost in KiB (4 GiB).
pub const MAX_MEMORY_KIB: u32 = 4 * 1024 * 1024;

/// Maximum Argon2 iterations.
pub const MAX_ITERATIONS: u32 = 100;

/// Maximum Argon2 parallelism.
pub const MAX_PARALLELISM: u32 = 64;

/// Default interval between revocation purges.
pub const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(60);

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure for Tollgate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TollgateConfig {
    /// Session token settings.
    #[serde(default)]
    pub token: TokenSettings,

    /// Password hashing settings.
    #[serde(default)]
    pub hashing: HashingSettings,

    /// Revocation cache settings.
    #[serde(default)]
    pub revocation: RevocationSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TollgateConfig {
    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.token.validate()?;
        self.hashing.validate()?;
        self.revocation.validate(&self.token)?;
        self.logging.validate()?;
        Ok(())
    }

    /// Builds the core token configuration.
    pub fn token_config(&self) -> ConfigResult<TokenConfig> {
        let secret = self
            .token
            .secret
            .as_ref()
            .ok_or_else(|| ConfigError::missing_field("token.secret"))?;

        Ok(TokenConfig::new(secret.expose())
            .with_issuer(&self.token.issuer)
            .with_validity(self.token.validity)
            .with_leeway(self.token.leeway)
            .with_algorithm(self.token.algorithm.into()))
    }

    /// Builds the core hashing parameters.
    pub fn hashing_params(&self) -> HashingParams {
        HashingParams::new(
            self.hashing.memory_kib,
            self.hashing.iterations,
            self.hashing.parallelism,
        )
    }

    /// Returns the revocation entry lifetime: the configured TTL, or the
    /// token validity plus leeway when unset.
    pub fn revocation_ttl(&self) -> Duration {
        self.revocation.ttl.unwrap_or_else(|| self.token.accepted_for())
    }
}

// =============================================================================
// Token Settings
// =============================================================================

/// Session token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenSettings {
    /// HMAC signing secret.
    #[serde(default)]
    pub secret: Option<SecretValue>,

    /// Token issuer.
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// How long a token is valid after login.
    #[serde(default = "default_validity", with = "humantime_serde")]
    pub validity: Duration,

    /// Clock skew tolerance on expiry.
    #[serde(default, with = "humantime_serde")]
    pub leeway: Duration,

    /// Signing algorithm.
    #[serde(default)]
    pub algorithm: TokenAlgorithm,
}

fn default_issuer() -> String {
    DEFAULT_ISSUER.to_string()
}

fn default_validity() -> Duration {
    DEFAULT_TOKEN_VALIDITY
}

impl TokenSettings {
    /// Returns how long after login a token is still accepted, leeway
    /// included.
    pub fn accepted_for(&self) -> Duration {
        self.validity.saturating_add(self.leeway)
    }

    /// Validates the token settings.
    pub fn validate(&self) -> ConfigResult<()> {
        let secret = self
            .secret
            .as_ref()
            .ok_or_else(|| ConfigError::missing_field("token.secret"))?;
        if secret.expose().is_empty() {
            return Err(ConfigError::validation("token.secret", "cannot be empty"));
        }
        if secret.expose().len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                "token.secret is shorter than recommended ({} bytes)",
                RECOMMENDED_SECRET_LEN
            );
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::validation("token.issuer", "cannot be empty"));
        }
        if self.validity.is_zero() {
            return Err(ConfigError::validation("token.validity", "cannot be zero"));
        }
        if self.leeway >= self.validity {
            return Err(ConfigError::validation(
                "token.leeway",
                "must be shorter than token.validity",
            ));
        }
        Ok(())
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            secret: None,
            issuer: default_issuer(),
            validity: DEFAULT_TOKEN_VALIDITY,
            leeway: Duration::ZERO,
            algorithm: TokenAlgorithm::default(),
        }
    }
}

/// Token signing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TokenAlgorithm {
    /// HMAC using SHA-256.
    #[default]
    HS256,
    /// HMAC using SHA-384.
    HS384,
    /// HMAC using SHA-512.
    HS512,
}

impl TokenAlgorithm {
    /// Parses an algorithm name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "HS256" => Some(TokenAlgorithm::HS256),
            "HS384" => Some(TokenAlgorithm::HS384),
            "HS512" => Some(TokenAlgorithm::HS512),
            _ => None,
        }
    }
}

impl From<TokenAlgorithm> for Algorithm {
    fn from(alg: TokenAlgorithm) -> Self {
        match alg {
            TokenAlgorithm::HS256 => Algorithm::HS256,
            TokenAlgorithm::HS384 => Algorithm::HS384,
            TokenAlgorithm::HS512 => Algorithm::HS512,
        }
    }
}

// =============================================================================
// Hashing Settings
// =============================================================================

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HashingSettings {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,

    /// Number of passes.
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    DEFAULT_MEMORY_KIB
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_parallelism() -> u32 {
    DEFAULT_PARALLELISM
}

impl HashingSettings {
    /// Validates the hashing settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=MAX_PARALLELISM).contains(&self.parallelism) {
            return Err(ConfigError::out_of_range(
                "hashing.parallelism",
                self.parallelism,
                1,
                MAX_PARALLELISM,
            ));
        }
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(ConfigError::out_of_range(
                "hashing.iterations",
                self.iterations,
                1,
                MAX_ITERATIONS,
            ));
        }
        let min_memory = MIN_MEMORY_KIB_PER_LANE * self.parallelism;
        if !(min_memory..=MAX_MEMORY_KIB).contains(&self.memory_kib) {
            return Err(ConfigError::out_of_range(
                "hashing.memory_kib",
                self.memory_kib,
                min_memory,
                MAX_MEMORY_KIB,
            ));
        }
        Ok(())
    }
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_MEMORY_KIB,
            iterations: DEFAULT_ITERATIONS,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

// =============================================================================
// Revocation Settings
// =============================================================================

/// Revocation cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RevocationSettings {
    /// How long a revocation entry lives after logout. Defaults to the token
    /// validity plus leeway and may not be shorter.
    #[serde(default, with = "humantime_serde")]
    pub ttl: Option<Duration>,

    /// Minimum time between opportunistic purges.
    #[serde(default = "default_purge_interval", with = "humantime_serde")]
    pub purge_interval: Duration,
}

fn default_purge_interval() -> Duration {
    DEFAULT_PURGE_INTERVAL
}

impl RevocationSettings {
    /// Validates the revocation settings against the token settings they
    /// have to outlive.
    pub fn validate(&self, token: &TokenSettings) -> ConfigResult<()> {
        if let Some(ttl) = self.ttl {
            if ttl < token.accepted_for() {
                return Err(ConfigError::validation(
                    "revocation.ttl",
                    "must be at least token.validity plus token.leeway",
                ));
            }
        }
        if self.purge_interval.is_zero() {
            return Err(ConfigError::validation(
                "revocation.purge_interval",
                "cannot be zero",
            ));
        }
        Ok(())
    }
}

impl Default for RevocationSettings {
    fn default() -> Self {
        Self {
            ttl: None,
            purge_interval: DEFAULT_PURGE_INTERVAL,
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Validates the logging configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a log level string.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Single-line compact text.
    Compact,
    /// JSON lines.
    Json,
}

impl LogFormat {
    /// Parses a log format string.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "compact" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

// =============================================================================
// Secret Value
// =============================================================================

/// A secret string that never prints its contents.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(String);

impl SecretValue {
    /// Creates a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "***")
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretValue(***)")
    }
}
