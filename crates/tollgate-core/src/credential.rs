// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Salted password hashing.
//!
//! Passwords are hashed with Argon2id. Each user gets a fresh random salt at
//! registration; the salt is stored next to the digest, and the digest itself
//! is a PHC string so the cost parameters travel with it.

use std::fmt;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::{AuthError, AuthResult};

// =============================================================================
// Constants
// =============================================================================

/// Password hashed at construction to back [`CredentialStore::verify_dummy`].
const DUMMY_PASSWORD: &str = "tollgate-dummy-password-for-timing-equalisation";

// =============================================================================
// HashingParams
// =============================================================================

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl HashingParams {
    /// Creates a parameter set.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    /// Smallest parameters Argon2 accepts. Only suitable for tests.
    pub fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }

    fn to_argon2(self) -> AuthResult<Params> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| AuthError::config(format!("invalid hashing parameters: {}", e)))
    }
}

impl Default for HashingParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

// =============================================================================
// Salt / Digest
// =============================================================================

/// A per-user random salt (unpadded base64).
#[derive(Clone, PartialEq, Eq)]
pub struct Salt(String);

impl Salt {
    /// Returns the salt as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn to_salt_string(&self) -> AuthResult<SaltString> {
        SaltString::from_b64(&self.0).map_err(|e| AuthError::internal(format!("invalid salt: {}", e)))
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Salt").field(&self.0).finish()
    }
}

/// A one-way password digest in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct Digest(String);

impl Digest {
    /// Returns the PHC string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Digest([REDACTED])")
    }
}

// =============================================================================
// CredentialStore
// =============================================================================

/// Hashes and verifies user secrets.
#[derive(Clone)]
pub struct CredentialStore {
    hasher: Argon2<'static>,
    params: HashingParams,
    dummy_salt: Salt,
    dummy_digest: Digest,
}

impl CredentialStore {
    /// Creates a store with the given cost parameters.
    pub fn new(params: HashingParams) -> AuthResult<Self> {
        let hasher = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);

        let dummy_salt = Self::random_salt();
        let dummy_digest = hash_with(&hasher, DUMMY_PASSWORD, &dummy_salt)?;

        Ok(Self {
            hasher,
            params,
            dummy_salt,
            dummy_digest,
        })
    }

    /// Returns the cost parameters in use.
    pub fn params(&self) -> HashingParams {
        self.params
    }

    /// Generates a fresh random salt.
    pub fn generate_salt(&self) -> Salt {
        Self::random_salt()
    }

    /// Hashes a password with the given salt.
    ///
    /// The result is deterministic for a given password, salt and parameter
    /// set.
    pub fn hash(&self, password: &str, salt: &Salt) -> AuthResult<Digest> {
        hash_with(&self.hasher, password, salt)
    }

    /// Checks a password against a stored salt and digest.
    ///
    /// The digest output comparison is constant-time. Any malformed input
    /// yields `false`.
    pub fn verify(&self, password: &str, salt: &Salt, digest: &Digest) -> bool {
        let parsed = match PasswordHash::new(digest.as_str()) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(error = %e, "Stored digest is not a valid PHC string");
                return false;
            }
        };

        if parsed.salt.map(|s| s.as_str()) != Some(salt.as_str()) {
            tracing::debug!("Stored digest salt does not match stored salt");
            return false;
        }

        self.hasher
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Runs a full verification against an internal digest and discards the
    /// result.
    ///
    /// Used when the user does not exist so that the response time matches
    /// that of a wrong password.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let _ = self.verify(password, &self.dummy_salt, &self.dummy_digest);
        false
    }

    fn random_salt() -> Salt {
        Salt(SaltString::generate(&mut OsRng).as_str().to_string())
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("algorithm", &"argon2id")
            .field("params", &self.params)
            .finish()
    }
}

fn hash_with(hasher: &Argon2<'_>, password: &str, salt: &Salt) -> AuthResult<Digest> {
    let salt_string = salt.to_salt_string()?;
    let hash = hasher
        .hash_password(password.as_bytes(), &salt_string)
        .map_err(|e| AuthError::internal(format!("failed to hash password: {}", e)))?;
    Ok(Digest(hash.to_string()))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CredentialStore {
        CredentialStore::new(HashingParams::minimal()).unwrap()
    }

    #[test]
    fn test_hash_is_deterministic_per_salt() {
        let store = store();
        let salt = store.generate_salt();

        let first = store.hash("password", &salt).unwrap();
        let second = store.hash("password", &salt).unwrap();
        assert_eq!(first, second);
        assert!(first.as_str().starts_with("$argon2id$"));
    }

    #[test]
    fn test_same_password_different_salt() {
        let store = store();
        let a = store.hash("password", &store.generate_salt()).unwrap();
        let b = store.hash("password", &store.generate_salt()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify() {
        let store = store();
        let salt = store.generate_salt();
        let digest = store.hash("hsbc", &salt).unwrap();

        assert!(store.verify("hsbc", &salt, &digest));
        assert!(!store.verify("HSBC", &salt, &digest));
        assert!(!store.verify("", &salt, &digest));
    }

    #[test]
    fn test_verify_rejects_mismatched_salt() {
        let store = store();
        let salt = store.generate_salt();
        let digest = store.hash("pw", &salt).unwrap();

        assert!(!store.verify("pw", &store.generate_salt(), &digest));
    }

    #[test]
    fn test_verify_malformed_digest() {
        let store = store();
        let salt = store.generate_salt();
        assert!(!store.verify("pw", &salt, &Digest("not-a-phc-string".to_string())));
    }

    #[test]
    fn test_verify_dummy_is_always_false() {
        let store = store();
        assert!(!store.verify_dummy(DUMMY_PASSWORD));
        assert!(!store.verify_dummy("anything"));
    }

    #[test]
    fn test_salt_length() {
        let store = store();
        // 16 random bytes, unpadded base64.
        assert_eq!(store.generate_salt().as_str().len(), 22);
    }

    #[test]
    fn test_invalid_params() {
        let result = CredentialStore::new(HashingParams::new(1, 1, 1));
        assert!(matches!(result, Err(AuthError::Config { .. })));
    }

    #[test]
    fn test_digest_debug_is_redacted() {
        let store = store();
        let digest = store.hash("secret", &store.generate_salt()).unwrap();
        assert_eq!(format!("{:?}", digest), "Digest([REDACTED])");
    }
}
