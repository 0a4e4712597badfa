//! Key-value backends behind [`SportsCache`](super::SportsCache)
//!
//! Both stores speak the edge-KV contract: string values, `put` with an
//! expiration TTL in seconds, `delete` tolerant of missing keys.

use async_trait::async_trait;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Write as _};
use std::io::ErrorKind;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::clock::Clock;
use crate::error::AppError;

#[async_trait]
pub trait KvStore: Send + Sync + fmt::Debug {
    /// Name used in log lines
    fn name(&self) -> &str;

    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn put(&self, key: &str, value: String, expiration_ttl: u64) -> Result<(), AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

fn expiry_from(now_millis: i64, ttl_seconds: u64) -> i64 {
    let ttl_millis = i64::try_from(ttl_seconds.saturating_mul(1000)).unwrap_or(i64::MAX);
    now_millis.saturating_add(ttl_millis)
}

#[derive(Debug, Clone)]
struct StoredValue {
    data: String,
    expires_at: i64,
}

/// In-process LRU store. Used as the fallback layer and as a dev substitute
/// for a durable backend.
pub struct MemoryKvStore {
    entries: RwLock<LruCache<String, StoredValue>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for MemoryKvStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryKvStore")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl MemoryKvStore {
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            clock,
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn capacity(&self) -> usize {
        self.entries.read().await.cap().get()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let now = self.clock.now_millis();
        // LRU lookups update recency, so even reads take the write lock
        let mut entries = self.entries.write().await;

        let expired = match entries.get(key) {
            Some(stored) if now < stored.expires_at => return Ok(Some(stored.data.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            debug!("Removing expired in-memory entry: key={}", key);
            entries.pop(key);
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: String, expiration_ttl: u64) -> Result<(), AppError> {
        let expires_at = expiry_from(self.clock.now_millis(), expiration_ttl);
        self.entries.write().await.put(
            key.to_string(),
            StoredValue {
                data: value,
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.entries.write().await.pop(key);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FileRecord {
    #[serde(default)]
    key: String,
    expires_at: i64,
    value: String,
}

/// Durable store keeping one JSON file per key under a directory.
///
/// File names are the hex SHA-256 digest of the key, so every key maps to a
/// valid fixed-length name however long the search query in it is.
/// Writes go to a temporary file and are renamed into place, so concurrent
/// writers of one key resolve as last-write-wins without torn files.
#[derive(Debug)]
pub struct FileKvStore {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileKvStore {
    pub fn new(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        let mut name = String::with_capacity(digest.len() * 2 + 5);
        for byte in digest {
            let _ = write!(name, "{byte:02x}");
        }
        name.push_str(".json");
        self.dir.join(name)
    }

    fn backend_error(&self, action: &str, path: &Path, err: impl fmt::Display) -> AppError {
        AppError::cache_backend(format!("{action} {} failed: {err}", path.display()))
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    fn name(&self) -> &str {
        "file"
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.path_for(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.backend_error("read", &path, e)),
        };

        let record: FileRecord = serde_json::from_str(&content)
            .map_err(|e| self.backend_error("decode", &path, e))?;

        if record.key != key {
            warn!("Cache file {} holds key {}, not {}", path.display(), record.key, key);
            return Ok(None);
        }

        if self.clock.now_millis() >= record.expires_at {
            debug!("Removing expired cache file: key={}", key);
            if let Err(e) = tokio::fs::remove_file(&path).await
                && e.kind() != ErrorKind::NotFound
            {
                warn!("Failed to remove expired cache file {}: {}", path.display(), e);
            }
            return Ok(None);
        }

        Ok(Some(record.value))
    }

    #[instrument(skip(self, value))]
    async fn put(&self, key: &str, value: String, expiration_ttl: u64) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| self.backend_error("create", &self.dir, e))?;

        let path = self.path_for(key);
        let record = FileRecord {
            key: key.to_string(),
            expires_at: expiry_from(self.clock.now_millis(), expiration_ttl),
            value,
        };
        let content =
            serde_json::to_string(&record).map_err(|e| self.backend_error("encode", &path, e))?;

        let tmp_path = path.with_extension(format!("tmp{}", rand::random::<u32>()));
        tokio::fs::write(&tmp_path, content)
            .await
            .map_err(|e| self.backend_error("write", &tmp_path, e))?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(self.backend_error("rename", &path, e));
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.backend_error("delete", &path, e)),
        }
    }
}
