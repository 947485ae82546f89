// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for Tollgate operations.
//!
//! Every public operation returns an [`AuthResult`]. The variants map one to
//! one onto the failure kinds callers are expected to branch on:
//!
//! ```text
//! AuthError
//! ├── InvalidInput   - empty or blank identifier / password
//! ├── AlreadyExists  - duplicate user or role
//! ├── NotFound       - operation on an absent user or role
//! ├── AuthFailed     - bad credentials at login (deliberately non-specific)
//! ├── TokenInvalid   - bad signature, revoked, or orphaned token
//! ├── TokenExpired   - valid signature, past expiry
//! ├── Config         - invalid token or hashing configuration
//! └── Internal       - signing or hashing failure
//! ```

use std::fmt;

use thiserror::Error;

/// Result type alias for Tollgate operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Message shared by every login failure so that unknown users and wrong
/// passwords are indistinguishable.
pub const AUTH_FAILED_MESSAGE: &str = "invalid username or password";

// =============================================================================
// EntityKind
// =============================================================================

/// The kind of registry entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A registered user.
    User,
    /// A role.
    Role,
}

impl EntityKind {
    /// Returns the entity kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Role => "role",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::User => write!(f, "User"),
            EntityKind::Role => write!(f, "Role"),
        }
    }
}

// =============================================================================
// AuthError
// =============================================================================

/// Errors returned by the registry, the token layer and the facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// An identifier or password was empty or blank.
    #[error("{field} can not be empty")]
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The entity already exists.
    #[error("{kind} '{name}' already exists")]
    AlreadyExists {
        /// Entity kind.
        kind: EntityKind,
        /// Entity key.
        name: String,
    },

    /// The entity does not exist.
    #[error("{kind} '{name}' does not exist")]
    NotFound {
        /// Entity kind.
        kind: EntityKind,
        /// Entity key.
        name: String,
    },

    /// Login failed. Carries no detail on purpose.
    #[error("{}", AUTH_FAILED_MESSAGE)]
    AuthFailed,

    /// The token is tampered, malformed, revoked, or refers to a user that
    /// no longer exists.
    #[error("token invalid")]
    TokenInvalid,

    /// The token signature is intact but the token is past its expiry.
    #[error("token expired")]
    TokenExpired,

    /// Invalid configuration.
    #[error("configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// Internal failure (signing, hashing).
    #[error("internal error: {message}")]
    Internal {
        /// Error message, for logging only.
        message: String,
    },
}

impl AuthError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates an invalid input error.
    pub fn invalid_input(field: &'static str) -> Self {
        Self::InvalidInput { field }
    }

    /// Creates an already-exists error for a user.
    pub fn user_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind: EntityKind::User,
            name: name.into(),
        }
    }

    /// Creates an already-exists error for a role.
    pub fn role_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind: EntityKind::Role,
            name: name.into(),
        }
    }

    /// Creates a not-found error for a user.
    pub fn user_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::User,
            name: name.into(),
        }
    }

    /// Creates a not-found error for a role.
    pub fn role_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Role,
            name: name.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns a stable error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidInput { .. } => "INVALID_INPUT",
            AuthError::AlreadyExists { .. } => "ALREADY_EXISTS",
            AuthError::NotFound { .. } => "NOT_FOUND",
            AuthError::AuthFailed => "AUTH_FAILED",
            AuthError::TokenInvalid => "TOKEN_INVALID",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::Config { .. } => "CONFIG_ERROR",
            AuthError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Returns `true` if this error came from presenting a token.
    pub fn is_token_error(&self) -> bool {
        matches!(self, AuthError::TokenInvalid | AuthError::TokenExpired)
    }

    /// Returns `true` if the caller should prompt for a fresh login rather
    /// than treat the request as hostile.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::TokenExpired)
    }

    /// Returns `true` if this error indicates a bug or misconfiguration
    /// rather than bad caller input.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AuthError::Config { .. } | AuthError::Internal { .. })
    }
}

// =============================================================================
// Tests
// =============================================================================
