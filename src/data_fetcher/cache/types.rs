//! Cache data structures with TTL support

use serde::{Deserialize, Serialize};

/// One cached value. Entries are replaced whole on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub key: String,
    pub value: T,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    /// Always `created_at + ttl_seconds * 1000`
    pub expires_at: i64,
}

impl<T> CacheEntry<T> {
    /// Creates a new cache entry expiring `ttl_seconds` after `created_at`
    pub fn new(key: impl Into<String>, value: T, created_at: i64, ttl_seconds: u64) -> Self {
        let ttl_millis = i64::try_from(ttl_seconds.saturating_mul(1000)).unwrap_or(i64::MAX);
        Self {
            key: key.into(),
            value,
            created_at,
            expires_at: created_at.saturating_add(ttl_millis),
        }
    }

    /// An entry read at or after its expiry is a miss
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        now_millis >= self.expires_at
    }

    /// Whole seconds left before expiry, 0 once expired
    pub fn remaining_ttl_seconds(&self, now_millis: i64) -> u64 {
        u64::try_from(self.expires_at.saturating_sub(now_millis)).unwrap_or(0) / 1000
    }

    pub fn ttl_seconds(&self) -> u64 {
        u64::try_from(self.expires_at - self.created_at).unwrap_or(0) / 1000
    }
}

/// Outcome of a best-effort cache write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheWriteOutcome {
    /// Written to every configured store
    Stored,
    /// The durable store rejected the write; the in-process copy serves the TTL window
    FallbackOnly { reason: String },
    /// Nothing was written
    Skipped { reason: String },
}

impl CacheWriteOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, CacheWriteOutcome::Stored)
    }
}

/// Counters for monitoring cache behavior
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub write_failures: u64,
    pub backend_errors: u64,
    pub memory_entries: usize,
    pub memory_capacity: usize,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}
