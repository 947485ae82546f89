// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The authorization facade.
//!
//! [`AuthService`] composes the registry, the token manager and the
//! revocation cache into the public operations. Every token check follows the
//! same path:
//!
//! ```text
//! verify signature ──► check denylist ──► check expiry ──► resolve user
//!        │                   │                 │                 │
//!   TokenInvalid        TokenInvalid      TokenExpired     orphaned token
//! ```
//!
//! A logged-out token stays on the denylist until the verifier would reject
//! it as expired anyway, so it never becomes usable again.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SharedClock, SystemClock};
use crate::credential::{CredentialStore, HashingParams};
use crate::error::{AuthError, AuthResult};
use crate::registry::{Registry, RoleSnapshot, UserSnapshot};
use crate::revocation::{RevocationCache, DEFAULT_PURGE_INTERVAL};
use crate::token::{Claims, TokenConfig, TokenManager, VerifyError};

// =============================================================================
// TokenState
// =============================================================================

/// The state of a presented token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenState {
    /// Signature intact, not expired, not revoked, user present.
    Valid,
    /// Signature intact but past expiry.
    Expired,
    /// Explicitly invalidated at logout.
    Revoked,
    /// Tampered, malformed, or the backing user is gone.
    Invalid,
}

impl TokenState {
    /// Returns the state as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenState::Valid => "valid",
            TokenState::Expired => "expired",
            TokenState::Revoked => "revoked",
            TokenState::Invalid => "invalid",
        }
    }

    /// Returns `true` for [`TokenState::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenState::Valid)
    }
}

impl fmt::Display for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// AuthService
// =============================================================================

/// User, role and session management.
///
/// `AuthService` is `Send + Sync`; build it once and share it behind an
/// [`Arc`].
///
/// # Examples
///
/// ```
/// use tollgate_core::{AuthService, HashingParams, TokenConfig};
///
/// let auth = AuthService::builder()
///     .token_config(TokenConfig::new("an-example-secret-that-is-32-bytes"))
///     .hashing(HashingParams::minimal())
///     .build()
///     .unwrap();
///
/// auth.register("alice", "pw1").unwrap();
/// auth.create_role("Dev").unwrap();
/// auth.add_role_to_user("Dev", "alice").unwrap();
///
/// let token = auth.login("alice", "pw1").unwrap();
/// assert!(auth.has_role(&token, "Dev").unwrap());
///
/// auth.logout(&token);
/// assert!(auth.has_role(&token, "Dev").is_err());
/// ```
pub struct AuthService {
    registry: Registry,
    tokens: TokenManager,
    revocations: RevocationCache,
    clock: SharedClock,
}

impl AuthService {
    /// Creates a new service builder.
    pub fn builder() -> AuthServiceBuilder {
        AuthServiceBuilder::new()
    }

    // =========================================================================
    // Registry operations
    // =========================================================================

    /// Registers a new user.
    pub fn register(&self, username: &str, password: &str) -> AuthResult<()> {
        self.registry.register_user(username, password, self.clock.now())?;
        info!(username, "User registered");
        Ok(())
    }

    /// Deletes a user. Outstanding tokens for the user become orphaned.
    pub fn delete_user(&self, username: &str) -> AuthResult<()> {
        self.registry.delete_user(username)?;
        info!(username, "User deleted");
        Ok(())
    }

    /// Creates a role.
    pub fn create_role(&self, role: &str) -> AuthResult<()> {
        self.registry.create_role(role, self.clock.now())?;
        info!(role, "Role created");
        Ok(())
    }

    /// Deletes a role and removes it from every user.
    pub fn delete_role(&self, role: &str) -> AuthResult<()> {
        let affected = self.registry.delete_role(role)?;
        info!(role, affected_users = affected, "Role deleted");
        Ok(())
    }

    /// Grants a role to a user.
    pub fn add_role_to_user(&self, role: &str, username: &str) -> AuthResult<()> {
        self.registry.assign_role(role, username)?;
        debug!(role, username, "Role assigned");
        Ok(())
    }

    /// Takes a role away from a user.
    pub fn remove_role_from_user(&self, role: &str, username: &str) -> AuthResult<()> {
        self.registry.unassign_role(role, username)?;
        debug!(role, username, "Role unassigned");
        Ok(())
    }

    /// Returns a snapshot of a user.
    pub fn user(&self, username: &str) -> Option<UserSnapshot> {
        self.registry.user(username)
    }

    /// Returns a snapshot of a role.
    pub fn role(&self, role: &str) -> Option<RoleSnapshot> {
        self.registry.role(role)
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Authenticates a user and issues a session token.
    ///
    /// Unknown users and wrong passwords fail identically with
    /// [`AuthError::AuthFailed`].
    pub fn login(&self, username: &str, password: &str) -> AuthResult<String> {
        if !self.registry.authenticate(username, password) {
            info!(username, "Login failed");
            return Err(AuthError::AuthFailed);
        }

        let token = self.tokens.issue(username, self.clock.now())?;
        info!(username, "Login succeeded");
        Ok(token)
    }

    /// Invalidates a token. Never fails.
    ///
    /// Tampered, malformed and expired tokens are ignored. A valid token is
    /// revoked even if its user has since been deleted.
    pub fn logout(&self, token: &str) {
        let now = self.clock.now();

        let claims = match self.tokens.verify(token, now) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(reason = %e, "Logout ignored");
                return;
            }
        };

        if !self.registry.user_exists(&claims.sub) {
            warn!(
                username = %claims.sub,
                "Logout for a user that no longer exists; the user was deleted or the signing secret has leaked"
            );
        }

        let rejected_from = self.tokens.rejected_from(&claims);
        if self.revocations.revoke(token, &claims.sub, rejected_from, now) {
            info!(username = %claims.sub, "Logged out");
        }
    }

    /// Returns `true` if the token's user holds the role.
    ///
    /// Returns `Ok(false)` if the user behind an otherwise valid token no
    /// longer exists.
    pub fn has_role(&self, token: &str, role: &str) -> AuthResult<bool> {
        let claims = self.authenticate(token)?;

        if !self.is_current_user(&claims) {
            warn!(
                username = %claims.sub,
                "Role check for a user that no longer exists; the user was deleted or the signing secret has leaked"
            );
            return Ok(false);
        }

        Ok(self.registry.has_role(&claims.sub, role))
    }

    /// Returns all roles of the token's user.
    ///
    /// Fails with [`AuthError::TokenInvalid`] if the user no longer exists.
    pub fn my_roles(&self, token: &str) -> AuthResult<BTreeSet<String>> {
        let claims = self.authenticate(token)?;

        let roles = self
            .is_current_user(&claims)
            .then(|| self.registry.roles_of(&claims.sub))
            .flatten()
            .ok_or_else(|| {
                warn!(
                    username = %claims.sub,
                    "Role listing for a user that no longer exists; the user was deleted or the signing secret has leaked"
                );
                AuthError::TokenInvalid
            })?;

        Ok(roles.into_iter().map(|r| r.into_inner()).collect())
    }

    /// Classifies a token without failing.
    ///
    /// A revoked token reports [`TokenState::Revoked`] even once it is past
    /// expiry.
    pub fn inspect(&self, token: &str) -> TokenState {
        let claims = match self.tokens.verify_signature(token) {
            Ok(claims) => claims,
            Err(_) => return TokenState::Invalid,
        };

        if self.revocations.is_revoked(token) {
            return TokenState::Revoked;
        }

        if let Err(VerifyError::Expired) = self.tokens.check_expiry(&claims, self.clock.now()) {
            return TokenState::Expired;
        }

        if self.is_current_user(&claims) {
            TokenState::Valid
        } else {
            TokenState::Invalid
        }
    }

    /// Drops revocation entries that are no longer needed.
    pub fn purge_revocations(&self) -> usize {
        self.revocations.purge_expired(self.clock.now())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the token manager.
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Returns the revocation cache.
    pub fn revocations(&self) -> &RevocationCache {
        &self.revocations
    }

    /// Returns the current time according to the service clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn authenticate(&self, token: &str) -> AuthResult<Claims> {
        let claims = self.tokens.verify_signature(token)?;

        if self.revocations.is_revoked(token) {
            debug!(username = %claims.sub, "Token is revoked");
            return Err(AuthError::TokenInvalid);
        }

        self.tokens.check_expiry(&claims, self.clock.now())?;
        Ok(claims)
    }

    /// Returns `true` if the token's user exists and the token was minted
    /// for the current account. Tokens issued before the user's current
    /// registration belong to an earlier account of the same name.
    fn is_current_user(&self, claims: &Claims) -> bool {
        self.registry
            .registered_at(&claims.sub)
            .is_some_and(|registered_at| claims.iat >= registered_at.timestamp())
    }
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("users", &self.registry.user_count())
            .field("roles", &self.registry.role_count())
            .field("revoked_tokens", &self.revocations.len())
            .field("tokens", &self.tokens)
            .finish()
    }
}

// =============================================================================
// AuthServiceBuilder
// =============================================================================

/// Builder for constructing an [`AuthService`].
pub struct AuthServiceBuilder {
    token_config: Option<TokenConfig>,
    hashing: HashingParams,
    clock: Option<SharedClock>,
    revocation_ttl: Option<Duration>,
    purge_interval: Duration,
}

impl AuthServiceBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            token_config: None,
            hashing: HashingParams::default(),
            clock: None,
            revocation_ttl: None,
            purge_interval: DEFAULT_PURGE_INTERVAL,
        }
    }

    /// Sets the token configuration. Required.
    pub fn token_config(mut self, config: TokenConfig) -> Self {
        self.token_config = Some(config);
        self
    }

    /// Sets the password hashing parameters.
    pub fn hashing(mut self, params: HashingParams) -> Self {
        self.hashing = params;
        self
    }

    /// Sets the clock.
    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets how long revocation entries live after logout. Defaults to the
    /// token validity plus leeway and may not be shorter.
    pub fn revocation_ttl(mut self, ttl: Duration) -> Self {
        self.revocation_ttl = Some(ttl);
        self
    }

    /// Sets the interval between opportunistic revocation purges.
    pub fn purge_interval(mut self, interval: Duration) -> Self {
        self.purge_interval = interval;
        self
    }

    /// Builds the service.
    pub fn build(self) -> AuthResult<AuthService> {
        let token_config = self
            .token_config
            .ok_or_else(|| AuthError::config("token configuration is required"))?;

        let lifetime = token_config.validity.saturating_add(token_config.leeway);
        let ttl = self.revocation_ttl.unwrap_or(lifetime);
        if ttl < lifetime {
            return Err(AuthError::config(format!(
                "revocation ttl ({}s) must cover the token validity plus leeway ({}s)",
                ttl.as_secs(),
                lifetime.as_secs()
            )));
        }
        let tokens = TokenManager::new(token_config)?;
        let credentials = CredentialStore::new(self.hashing)?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        debug!(?tokens, hashing = ?credentials.params(), "Auth service initialised");

        Ok(AuthService {
            registry: Registry::new(credentials),
            tokens,
            revocations: RevocationCache::with_purge_interval(ttl, self.purge_interval),
            clock,
        })
    }
}

impl Default for AuthServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
