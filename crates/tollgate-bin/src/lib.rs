// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # tollgate-bin
//!
//! The `tollgate` command-line tool.
//!
//! - CLI argument parsing with clap
//! - Logging initialization from flags or the config file
//! - Command implementations (validate, version, gen-secret, hash-password, demo)
//!
//! ## Usage
//!
//! ```bash
//! # Validate configuration
//! tollgate -c /etc/tollgate/config.yaml validate --strict
//!
//! # Generate a signing secret
//! tollgate gen-secret
//!
//! # Hash a password
//! echo -n 'pw1' | tollgate hash-password --stdin
//!
//! # Walk through login, role checks and logout
//! tollgate demo
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
