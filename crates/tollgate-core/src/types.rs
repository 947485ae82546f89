// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identifier types.
//!
//! Usernames and role names are the registry keys. Both are non-blank
//! strings; the check happens once, at construction, so the rest of the crate
//! can take them for granted.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Returns `true` if the input is empty or whitespace-only.
#[inline]
pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}

// =============================================================================
// Username
// =============================================================================

/// The unique, immutable identity of a user.
///
/// # Examples
///
/// ```
/// use tollgate_core::types::Username;
///
/// let name = Username::parse("alice").unwrap();
/// assert_eq!(name.as_str(), "alice");
/// assert!(Username::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Validates and wraps a username.
    pub fn parse(name: impl Into<String>) -> AuthResult<Self> {
        let name = name.into();
        if is_blank(&name) {
            return Err(AuthError::invalid_input("username"));
        }
        Ok(Self(name))
    }

    /// Returns the username as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the username and returns the inner string.
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Username {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// RoleName
// =============================================================================

/// The unique, immutable identity of a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    /// Validates and wraps a role name.
    pub fn parse(name: impl Into<String>) -> AuthResult<Self> {
        let name = name.into();
        if is_blank(&name) {
            return Err(AuthError::invalid_input("role name"));
        }
        Ok(Self(name))
    }

    /// Returns the role name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the role name and returns the inner string.
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RoleName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n"));
        assert!(!is_blank(" a "));
    }

    #[test]
    fn test_username_parse() {
        let name = Username::parse("Leen Li").unwrap();
        assert_eq!(name.as_str(), "Leen Li");
        assert_eq!(name.to_string(), "Leen Li");

        assert_eq!(
            Username::parse("").unwrap_err(),
            AuthError::invalid_input("username")
        );
    }

    #[test]
    fn test_role_name_parse() {
        let role = RoleName::parse("Developer").unwrap();
        assert_eq!(role.into_inner(), "Developer");

        assert_eq!(
            RoleName::parse(" ").unwrap_err(),
            AuthError::invalid_input("role name")
        );
    }

    #[test]
    fn test_borrow_lookup() {
        let mut set = std::collections::HashSet::new();
        set.insert(RoleName::parse("Admin").unwrap());
        assert!(set.contains("Admin"));
    }
}
