// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # tollgate-core
//!
//! In-process authentication and authorization for Tollgate.
//!
//! This crate manages users, roles and role assignments, issues signed
//! session tokens at login, and revokes them at logout even though the tokens
//! themselves are stateless.
//!
//! ## Components
//!
//! - [`credential`] - salted Argon2id password hashing
//! - [`registry`] - concurrent user and role maps with assignment edges
//! - [`token`] - HMAC-signed JWT issue and verification
//! - [`revocation`] - time-bounded token denylist
//! - [`service`] - the [`AuthService`] facade combining the above
//! - [`clock`] - injectable time source
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use tollgate_core::{AuthError, AuthService, HashingParams, TokenConfig};
//!
//! let auth = Arc::new(
//!     AuthService::builder()
//!         .token_config(TokenConfig::new("VeKcPGNcxYOCVRUDnzoEzwhtYGQddlRu"))
//!         .hashing(HashingParams::minimal())
//!         .build()
//!         .unwrap(),
//! );
//!
//! auth.register("bob", "pw2").unwrap();
//! let token = auth.login("bob", "pw2").unwrap();
//! assert!(auth.my_roles(&token).unwrap().is_empty());
//!
//! assert_eq!(auth.login("bob", "wrong"), Err(AuthError::AuthFailed));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod clock;
pub mod credential;
pub mod error;
pub mod registry;
pub mod revocation;
pub mod service;
pub mod token;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use credential::{CredentialStore, HashingParams};
pub use error::{AuthError, AuthResult, EntityKind, AUTH_FAILED_MESSAGE};
pub use registry::{Registry, RoleSnapshot, UserSnapshot};
pub use revocation::{RevocationCache, RevocationEntry};
pub use service::{AuthService, AuthServiceBuilder, TokenState};
pub use token::{Algorithm, Claims, TokenConfig, TokenManager, VerifyError};
pub use types::{RoleName, Username};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
