// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # tollgate-config
//!
//! Configuration management for Tollgate.
//!
//! ## Features
//!
//! - **Schema Definition**: token, hashing, revocation and logging sections with validation
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: override values via `TOLLGATE_*` variables
//! - **Service Wiring**: build an [`AuthService`](tollgate_core::AuthService) straight from a config
//!
//! ## Quick Start
//!
//! ```no_run
//! use tollgate_config::{load_config, FromConfig};
//! use tollgate_core::AuthService;
//!
//! let config = load_config("tollgate.yaml").unwrap();
//! let auth = AuthService::from_config(&config).unwrap();
//! ```
//!
//! ## Example File
//!
//! ```yaml
//! token:
//!   secret: "${TOLLGATE_SECRET}"
//!   issuer: tollgate
//!   validity: 2h
//!   leeway: 0s
//!   algorithm: HS256
//! hashing:
//!   memory_kib: 19456
//!   iterations: 2
//!   parallelism: 1
//! revocation:
//!   purge_interval: 1m
//! logging:
//!   level: info
//!   format: text
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader, ConfigLoaderBuilder};
pub use schema::{
    HashingSettings, LogFormat, LogLevel, LoggingConfig, RevocationSettings, SecretValue,
    TokenAlgorithm, TokenSettings, TollgateConfig,
};
pub use service::{builder_from_config, service_with_clock, FromConfig};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
