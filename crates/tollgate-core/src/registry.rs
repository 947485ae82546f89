// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory user and role registry.
//!
//! Users and roles live in two [`DashMap`]s keyed by name. Role assignments
//! are stored as a set of role names on each user.
//!
//! Lock order is roles before users. [`Registry::assign_role`] holds a read
//! guard on the role while it mutates the user, so a concurrent
//! [`Registry::delete_role`] is either fully before the assignment (which then
//! fails with `NotFound`) or fully after it (and its cascade removes the
//! assignment again).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;

use crate::credential::{CredentialStore, Digest, Salt};
use crate::error::{AuthError, AuthResult};
use crate::types::{is_blank, RoleName, Username};

// =============================================================================
// Records
// =============================================================================

/// A stored user, including credentials.
#[derive(Debug, Clone)]
struct UserRecord {
    salt: Salt,
    digest: Digest,
    roles: BTreeSet<RoleName>,
    registered_at: DateTime<Utc>,
}

/// A stored role.
#[derive(Debug, Clone)]
struct RoleRecord {
    created_at: DateTime<Utc>,
}

/// A read-only copy of a user without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSnapshot {
    /// The username.
    pub username: Username,
    /// Assigned role names.
    pub roles: BTreeSet<RoleName>,
    /// When the user was registered.
    pub registered_at: DateTime<Utc>,
}

impl UserSnapshot {
    /// Returns `true` if the user holds the role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// A read-only copy of a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSnapshot {
    /// The role name.
    pub name: RoleName,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Registry
// =============================================================================

/// Concurrent store of users, roles and role assignments.
#[derive(Debug)]
pub struct Registry {
    users: DashMap<Username, UserRecord>,
    roles: DashMap<RoleName, RoleRecord>,
    credentials: CredentialStore,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new(credentials: CredentialStore) -> Self {
        Self {
            users: DashMap::new(),
            roles: DashMap::new(),
            credentials,
        }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Registers a new user.
    ///
    /// The password is hashed before any map lock is taken; the insert goes
    /// through the entry API so two concurrent registrations of the same name
    /// cannot both succeed.
    pub fn register_user(&self, username: &str, password: &str, now: DateTime<Utc>) -> AuthResult<()> {
        let username = Username::parse(username)?;
        if is_blank(password) {
            return Err(AuthError::invalid_input("password"));
        }

        // Skip the expensive hash for the common duplicate case.
        if self.users.contains_key(username.as_str()) {
            return Err(AuthError::user_exists(username.into_inner()));
        }

        let salt = self.credentials.generate_salt();
        let digest = self.credentials.hash(password, &salt)?;

        match self.users.entry(username) {
            Entry::Occupied(entry) => Err(AuthError::user_exists(entry.key().as_str())),
            Entry::Vacant(entry) => {
                entry.insert(UserRecord {
                    salt,
                    digest,
                    roles: BTreeSet::new(),
                    registered_at: now,
                });
                Ok(())
            }
        }
    }

    /// Deletes a user.
    pub fn delete_user(&self, username: &str) -> AuthResult<()> {
        self.users
            .remove(username)
            .map(|_| ())
            .ok_or_else(|| AuthError::user_not_found(username))
    }

    /// Returns `true` if the user exists.
    pub fn user_exists(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Checks a password for a user.
    ///
    /// Returns `false` for unknown users after doing the same amount of
    /// hashing work as for a wrong password.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        let stored = self
            .users
            .get(username)
            .map(|user| (user.salt.clone(), user.digest.clone()));

        match stored {
            Some((salt, digest)) => self.credentials.verify(password, &salt, &digest),
            None => self.credentials.verify_dummy(password),
        }
    }

    /// Returns a snapshot of a user.
    pub fn user(&self, username: &str) -> Option<UserSnapshot> {
        self.users.get(username).map(|user| UserSnapshot {
            username: user.key().clone(),
            roles: user.roles.clone(),
            registered_at: user.registered_at,
        })
    }

    /// Returns when the user's current account was registered.
    pub fn registered_at(&self, username: &str) -> Option<DateTime<Utc>> {
        self.users.get(username).map(|user| user.registered_at)
    }

    /// Returns all usernames, sorted.
    pub fn usernames(&self) -> Vec<Username> {
        let mut names: Vec<_> = self.users.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Returns the number of users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    // =========================================================================
    // Roles
    // =========================================================================

    /// Creates a new role.
    pub fn create_role(&self, role: &str, now: DateTime<Utc>) -> AuthResult<()> {
        let role = RoleName::parse(role)?;

        match self.roles.entry(role) {
            Entry::Occupied(entry) => Err(AuthError::role_exists(entry.key().as_str())),
            Entry::Vacant(entry) => {
                entry.insert(RoleRecord { created_at: now });
                Ok(())
            }
        }
    }

    /// Deletes a role and removes it from every user holding it.
    ///
    /// Returns the number of users the role was removed from.
    pub fn delete_role(&self, role: &str) -> AuthResult<usize> {
        if self.roles.remove(role).is_none() {
            return Err(AuthError::role_not_found(role));
        }

        let mut affected = 0;
        for mut user in self.users.iter_mut() {
            if user.roles.remove(role) {
                affected += 1;
            }
        }
        Ok(affected)
    }

    /// Returns `true` if the role exists.
    pub fn role_exists(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    /// Returns a snapshot of a role.
    pub fn role(&self, role: &str) -> Option<RoleSnapshot> {
        self.roles.get(role).map(|r| RoleSnapshot {
            name: r.key().clone(),
            created_at: r.created_at,
        })
    }

    /// Returns all role names, sorted.
    pub fn role_names(&self) -> Vec<RoleName> {
        let mut names: Vec<_> = self.roles.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Returns the number of roles.
    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    // =========================================================================
    // Assignments
    // =========================================================================

    /// Grants a role to a user. Granting a role the user already holds is a
    /// no-op.
    pub fn assign_role(&self, role: &str, username: &str) -> AuthResult<()> {
        let role_entry = self
            .roles
            .get(role)
            .ok_or_else(|| AuthError::role_not_found(role))?;

        let mut user = self
            .users
            .get_mut(username)
            .ok_or_else(|| AuthError::user_not_found(username))?;

        user.roles.insert(role_entry.key().clone());
        Ok(())
    }

    /// Revokes a role from a user. Revoking a role the user does not hold is
    /// a no-op.
    pub fn unassign_role(&self, role: &str, username: &str) -> AuthResult<()> {
        let mut user = self
            .users
            .get_mut(username)
            .ok_or_else(|| AuthError::user_not_found(username))?;

        user.roles.remove(role);
        Ok(())
    }

    /// Returns `true` if the user exists and holds the role.
    pub fn has_role(&self, username: &str, role: &str) -> bool {
        self.users
            .get(username)
            .map(|user| user.roles.contains(role))
            .unwrap_or(false)
    }

    /// Returns the roles of a user, or `None` if the user does not exist.
    pub fn roles_of(&self, username: &str) -> Option<BTreeSet<RoleName>> {
        self.users.get(username).map(|user| user.roles.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================
