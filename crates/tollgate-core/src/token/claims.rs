// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in every session token.
///
/// Only the identity is carried. Roles are always read from the registry at
/// check time so that grants and revocations take effect immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username.
    pub sub: String,

    /// Issued at (Unix timestamp, seconds).
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds).
    pub exp: i64,

    /// Issuer.
    pub iss: String,

    /// Unique token id.
    pub jti: String,
}

impl Claims {
    /// Creates claims for a user, issued at `now` and valid for `validity`.
    pub fn new(
        username: impl Into<String>,
        issuer: impl Into<String>,
        now: DateTime<Utc>,
        validity: chrono::Duration,
    ) -> Self {
        let iat = now.timestamp();
        Self {
            sub: username.into(),
            iat,
            exp: iat.saturating_add(validity.num_seconds()),
            iss: issuer.into(),
            jti: Uuid::now_v7().to_string(),
        }
    }

    /// Returns `true` if the claims are past expiry at `now`, allowing
    /// `leeway_secs` of clock skew.
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway_secs: i64) -> bool {
        now.timestamp() > self.exp.saturating_add(leeway_secs)
    }

    /// Returns the first instant at which [`Claims::is_expired_at`] holds for
    /// the given leeway.
    pub fn rejected_from(&self, leeway_secs: i64) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp.saturating_add(leeway_secs).saturating_add(1), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::new("alice", "tollgate", now, chrono::Duration::hours(2));

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iss, "tollgate");
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_007_200);
        assert!(Uuid::parse_str(&claims.jti).is_ok());
    }

    #[test]
    fn test_claims_expiration() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::new("alice", "tollgate", now, chrono::Duration::seconds(60));

        assert!(!claims.is_expired_at(now, 0));
        assert!(!claims.is_expired_at(now + chrono::Duration::seconds(60), 0));
        assert!(claims.is_expired_at(now + chrono::Duration::seconds(61), 0));
        assert!(!claims.is_expired_at(now + chrono::Duration::seconds(61), 5));

        let rejected = claims.rejected_from(5).unwrap();
        assert_eq!(rejected, now + chrono::Duration::seconds(66));
        assert!(claims.is_expired_at(rejected, 5));
        assert!(!claims.is_expired_at(rejected - chrono::Duration::milliseconds(1), 5));
    }

    #[test]
    fn test_unique_ids() {
        let now = Utc::now();
        let a = Claims::new("alice", "tollgate", now, chrono::Duration::hours(1));
        let b = Claims::new("alice", "tollgate", now, chrono::Duration::hours(1));
        assert_ne!(a.jti, b.jti);
    }
}
