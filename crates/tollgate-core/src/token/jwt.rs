// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT signing and verification.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{Claims, VerifyError};
use crate::error::{AuthError, AuthResult};

/// Recommended minimum secret length in bytes.
pub const RECOMMENDED_SECRET_LEN: usize = 32;

// =============================================================================
// TokenConfig
// =============================================================================

/// Token configuration.
#[derive(Clone)]
pub struct TokenConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token issuer.
    pub issuer: String,
    /// How long a token stays valid after issue.
    pub validity: Duration,
    /// Clock skew tolerance applied to expiry.
    pub leeway: Duration,
    /// Signing algorithm. HMAC only.
    pub algorithm: Algorithm,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set by user
            issuer: "tollgate".to_string(),
            validity: Duration::from_secs(2 * 3600),
            leeway: Duration::ZERO,
            algorithm: Algorithm::HS256,
        }
    }
}

impl TokenConfig {
    /// Creates a new configuration with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Sets the validity period.
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    /// Sets the expiry leeway.
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Sets the signing algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AuthResult<()> {
        if self.secret.is_empty() {
            return Err(AuthError::config("token secret is not configured"));
        }
        if self.secret.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                len = self.secret.len(),
                "Token secret is shorter than recommended ({} bytes)",
                RECOMMENDED_SECRET_LEN
            );
        }
        if self.issuer.trim().is_empty() {
            return Err(AuthError::config("token issuer can not be empty"));
        }
        if self.validity.is_zero() {
            return Err(AuthError::config("token validity must be greater than zero"));
        }
        if !matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(AuthError::config(format!(
                "unsupported token algorithm {:?}, expected HS256, HS384 or HS512",
                self.algorithm
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("validity", &self.validity)
            .field("leeway", &self.leeway)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

// =============================================================================
// TokenManager
// =============================================================================

/// Issues and verifies session tokens.
///
/// Expiry is evaluated against the `now` passed in by the caller, never
/// against the wall clock.
#[derive(Clone)]
pub struct TokenManager {
    config: Arc<TokenConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
    validity: chrono::Duration,
    leeway_secs: i64,
}

impl TokenManager {
    /// Creates a new token manager with the given configuration.
    pub fn new(config: TokenConfig) -> AuthResult<Self> {
        config.validate()?;

        let validity = chrono::Duration::from_std(config.validity)
            .map_err(|_| AuthError::config("token validity is out of range"))?;
        let leeway_secs = i64::try_from(config.leeway.as_secs())
            .map_err(|_| AuthError::config("token leeway is out of range"))?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);
        validation.validate_aud = false;
        // Expiry is checked against the caller's clock after the signature.
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
            validity,
            leeway_secs,
        })
    }

    /// Issues a token for a user at `now`.
    pub fn issue(&self, username: &str, now: DateTime<Utc>) -> AuthResult<String> {
        let claims = Claims::new(username, &self.config.issuer, now, self.validity);
        self.sign(&claims)
    }

    /// Signs arbitrary claims.
    pub fn sign(&self, claims: &Claims) -> AuthResult<String> {
        let header = Header::new(self.config.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| AuthError::internal(format!("Failed to create token: {}", e)))
    }

    /// Verifies a token at `now`.
    ///
    /// Signature, structure and issuer are checked first; expiry only for
    /// tokens that pass those checks.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, VerifyError> {
        let claims = self.verify_signature(token)?;
        self.check_expiry(&claims, now)?;
        Ok(claims)
    }

    /// Checks signature, structure and issuer without looking at expiry.
    pub fn verify_signature(&self, token: &str) -> Result<Claims, VerifyError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, kind = ?e.kind(), "Token rejected");
                VerifyError::BadSignature
            })
    }

    /// Fails with [`VerifyError::Expired`] if the claims are past expiry at
    /// `now`, leeway included.
    pub fn check_expiry(&self, claims: &Claims, now: DateTime<Utc>) -> Result<(), VerifyError> {
        if claims.is_expired_at(now, self.leeway_secs) {
            tracing::debug!(sub = %claims.sub, exp = claims.exp, "Token expired");
            return Err(VerifyError::Expired);
        }
        Ok(())
    }

    /// Returns the first instant at which [`TokenManager::verify`] reports
    /// the token as expired.
    pub fn rejected_from(&self, claims: &Claims) -> DateTime<Utc> {
        claims
            .rejected_from(self.leeway_secs)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Returns the token validity period.
    pub fn validity(&self) -> Duration {
        self.config.validity
    }

    /// Returns the issuer.
    pub fn issuer(&self) -> &str {
        &self.config.issuer
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("issuer", &self.config.issuer)
            .field("algorithm", &self.config.algorithm)
            .field("validity", &self.config.validity)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
