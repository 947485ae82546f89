// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Time-bounded token denylist.
//!
//! A revoked token is remembered for a fixed TTL after logout, and never less
//! than until the verifier would reject it as expired anyway. Each entry
//! carries its own expiry and dead entries are dropped by
//! [`RevocationCache::purge_expired`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;

/// Default interval between opportunistic purges.
pub const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(60);

// =============================================================================
// RevocationEntry
// =============================================================================

/// A revoked token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevocationEntry {
    /// When the token was revoked.
    pub revoked_at: DateTime<Utc>,
    /// The token's subject. May refer to a user that no longer exists.
    pub username: String,
    /// When the entry may be forgotten.
    pub expires_at: DateTime<Utc>,
}

impl RevocationEntry {
    /// Returns `true` if the entry is dead at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

// =============================================================================
// RevocationCache
// =============================================================================

/// Concurrent set of revoked tokens with per-entry expiry.
#[derive(Debug)]
pub struct RevocationCache {
    entries: DashMap<String, RevocationEntry>,
    ttl: chrono::Duration,
    purge_interval: chrono::Duration,
    last_purge: Mutex<Option<DateTime<Utc>>>,
}

impl RevocationCache {
    /// Creates a cache whose entries live `ttl` after revocation.
    pub fn new(ttl: Duration) -> Self {
        Self::with_purge_interval(ttl, DEFAULT_PURGE_INTERVAL)
    }

    /// Creates a cache with an explicit purge interval.
    pub fn with_purge_interval(ttl: Duration, purge_interval: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: to_chrono(ttl),
            purge_interval: to_chrono(purge_interval),
            last_purge: Mutex::new(None),
        }
    }

    /// Records a token as revoked.
    ///
    /// `rejected_from` is the first instant at which the token fails
    /// verification as expired. The entry expires at `now + ttl`, or at
    /// `rejected_from` if that is later. Revoking an already revoked token
    /// keeps the original entry. Returns `true` if the token was not revoked
    /// before.
    pub fn revoke(
        &self,
        token: &str,
        username: &str,
        rejected_from: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        self.maybe_purge(now);

        let retained = now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut inserted = false;
        self.entries.entry(token.to_string()).or_insert_with(|| {
            inserted = true;
            RevocationEntry {
                revoked_at: now,
                username: username.to_string(),
                expires_at: retained.max(rejected_from),
            }
        });
        inserted
    }

    /// Returns `true` if the token has been revoked.
    pub fn is_revoked(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Returns the entry for a revoked token.
    pub fn entry(&self, token: &str) -> Option<RevocationEntry> {
        self.entries.get(token).map(|e| e.value().clone())
    }

    /// Drops every entry that is dead at `now`. Returns the number removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before.saturating_sub(self.entries.len());

        *self.last_purge.lock() = Some(now);
        if removed > 0 {
            tracing::debug!(removed, remaining = self.entries.len(), "Purged revocation entries");
        }
        removed
    }

    /// Returns the number of entries, including dead ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn maybe_purge(&self, now: DateTime<Utc>) {
        let due = {
            let mut last = self.last_purge.lock();
            match *last {
                None => {
                    *last = Some(now);
                    false
                }
                Some(at) => now.signed_duration_since(at) >= self.purge_interval,
            }
        };

        if due {
            self.purge_expired(now);
        }
    }
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}

// =============================================================================
// Tests
// =============================================================================
