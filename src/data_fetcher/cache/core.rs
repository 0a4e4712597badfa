use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument, warn};

use super::clock::{Clock, SystemClock};
use super::store::{FileKvStore, KvStore, MemoryKvStore};
use super::types::{CacheEntry, CacheStats, CacheWriteOutcome};
use crate::config::Config;

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    write_failures: AtomicU64,
    backend_errors: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug)]
struct CacheInner {
    primary: Option<Arc<dyn KvStore>>,
    fallback: MemoryKvStore,
    clock: Arc<dyn Clock>,
    counters: Counters,
}

/// Two-layer TTL cache shared by every orchestrated request.
///
/// Values are stored as JSON-encoded [`CacheEntry`] records. Reads consult the
/// in-process layer first and the durable store second; writes go to both.
/// When the durable write fails the old durable copy is purged, so the
/// in-process value is the only one readers can see.
/// Backend failures never reach the caller: a failed read is a miss and a
/// failed write is reported through [`CacheWriteOutcome`].
///
/// Cloning is cheap; clones share the same stores and counters.
#[derive(Debug, Clone)]
pub struct SportsCache {
    inner: Arc<CacheInner>,
}

impl SportsCache {
    /// Cache with an optional durable store in front of an in-process LRU
    pub fn new(
        primary: Option<Arc<dyn KvStore>>,
        memory_capacity: usize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                primary,
                fallback: MemoryKvStore::new(memory_capacity, clock.clone()),
                clock,
                counters: Counters::default(),
            }),
        }
    }

    /// Process-local cache with no durable store
    pub fn in_memory(memory_capacity: usize) -> Self {
        Self::new(None, memory_capacity, Arc::new(SystemClock))
    }

    /// Builds the cache described by the `[cache]` section of the config
    pub fn from_config(config: &Config) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let primary: Option<Arc<dyn KvStore>> = if config.cache.durable {
            let dir = config
                .cache
                .directory
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(Config::get_cache_dir_path()));
            info!("Using durable cache directory: {}", dir.display());
            Some(Arc::new(FileKvStore::new(dir, clock.clone())))
        } else {
            None
        };
        Self::new(primary, config.cache.memory_capacity, clock)
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.inner.clock
    }

    /// Returns the cached value for `key`, or `None` on a miss
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_entry(key).await.map(|entry| entry.value)
    }

    /// Returns the full cache entry for `key` including its timestamps
    #[instrument(skip(self))]
    pub async fn get_entry<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        let now = self.inner.clock.now_millis();

        // The in-process layer never fails
        if let Ok(Some(raw)) = self.inner.fallback.get(key).await
            && let Some(entry) = self.decode_live::<T>(key, &raw, now, "memory")
        {
            Counters::bump(&self.inner.counters.hits);
            debug!("Cache hit: key={}, store=memory", key);
            return Some(entry);
        }

        if let Some(primary) = &self.inner.primary {
            match primary.get(key).await {
                Ok(Some(raw)) => {
                    if let Some(entry) = self.decode_live::<T>(key, &raw, now, primary.name()) {
                        Counters::bump(&self.inner.counters.hits);
                        debug!("Cache hit: key={}, store={}", key, primary.name());
                        return Some(entry);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    Counters::bump(&self.inner.counters.backend_errors);
                    warn!(
                        "Cache read failed on {} store, treating as miss: key={}, error={}",
                        primary.name(),
                        key,
                        e
                    );
                }
            }
        }

        Counters::bump(&self.inner.counters.misses);
        debug!("Cache miss: key={}", key);
        None
    }

    fn decode_live<T: DeserializeOwned>(
        &self,
        key: &str,
        raw: &str,
        now: i64,
        store: &str,
    ) -> Option<CacheEntry<T>> {
        match serde_json::from_str::<CacheEntry<T>>(raw) {
            Ok(entry) if entry.is_expired_at(now) => {
                debug!("Ignoring expired entry from {} store: key={}", store, key);
                None
            }
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(
                    "Undecodable cache payload in {} store, treating as miss: key={}, error={}",
                    store, key, e
                );
                None
            }
        }
    }

    /// Stores `value` under `key` for `ttl_seconds`.
    ///
    /// Best effort: the returned outcome says which layers accepted the
    /// write. A zero TTL stores nothing.
    #[instrument(skip(self, value))]
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) -> CacheWriteOutcome {
        if ttl_seconds == 0 {
            return CacheWriteOutcome::Skipped {
                reason: "ttl is zero".to_string(),
            };
        }

        let entry = CacheEntry::new(key, value, self.inner.clock.now_millis(), ttl_seconds);
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                Counters::bump(&self.inner.counters.write_failures);
                warn!("Failed to encode cache entry: key={}, error={}", key, e);
                return CacheWriteOutcome::Skipped {
                    reason: format!("encode failed: {e}"),
                };
            }
        };

        // Memory first so this process keeps the value even if the durable write fails
        if let Err(e) = self.inner.fallback.put(key, raw.clone(), ttl_seconds).await {
            warn!("In-memory cache write failed: key={}, error={}", key, e);
        }

        let outcome = match &self.inner.primary {
            None => CacheWriteOutcome::Stored,
            Some(primary) => match primary.put(key, raw, ttl_seconds).await {
                Ok(()) => CacheWriteOutcome::Stored,
                Err(e) => {
                    Counters::bump(&self.inner.counters.write_failures);
                    Counters::bump(&self.inner.counters.backend_errors);
                    warn!(
                        "Durable cache write failed on {} store, kept in memory only: key={}, error={}",
                        primary.name(),
                        key,
                        e
                    );
                    // An older durable copy would outlive the in-process one
                    if let Err(purge) = primary.delete(key).await {
                        Counters::bump(&self.inner.counters.backend_errors);
                        warn!(
                            "Could not purge stale entry from {} store: key={}, error={}",
                            primary.name(),
                            key,
                            purge
                        );
                    }
                    CacheWriteOutcome::FallbackOnly {
                        reason: e.to_string(),
                    }
                }
            },
        };

        Counters::bump(&self.inner.counters.writes);
        debug!("Cached value: key={}, ttl={}s", key, ttl_seconds);
        outcome
    }

    /// Removes `key` from every layer. Missing keys are not an error.
    #[instrument(skip(self))]
    pub async fn invalidate(&self, key: &str) {
        if let Some(primary) = &self.inner.primary
            && let Err(e) = primary.delete(key).await
        {
            Counters::bump(&self.inner.counters.backend_errors);
            warn!(
                "Cache delete failed on {} store: key={}, error={}",
                primary.name(),
                key,
                e
            );
        }
        if let Err(e) = self.inner.fallback.delete(key).await {
            warn!("Cache delete failed on memory store: key={}, error={}", key, e);
        }
        debug!("Invalidated cache key: {}", key);
    }

    /// Snapshot of the cache counters
    pub async fn stats(&self) -> CacheStats {
        let counters = &self.inner.counters;
        CacheStats {
            hits: counters.hits.load(Ordering::Relaxed),
            misses: counters.misses.load(Ordering::Relaxed),
            writes: counters.writes.load(Ordering::Relaxed),
            write_failures: counters.write_failures.load(Ordering::Relaxed),
            backend_errors: counters.backend_errors.load(Ordering::Relaxed),
            memory_entries: self.inner.fallback.len().await,
            memory_capacity: self.inner.fallback.capacity().await,
        }
    }

    /// Empties the in-process layer; the durable store is untouched
    pub async fn clear_memory(&self) {
        self.inner.fallback.clear().await;
        info!("Cleared in-memory cache layer");
    }
}
