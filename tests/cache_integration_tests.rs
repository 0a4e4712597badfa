use async_trait::async_trait;
use sports_hub::data_fetcher::cache::{
    CacheOptions, CacheWriteOutcome, DataKind, FileKvStore, KvStore, ManualClock, MemoryKvStore,
    SportsCache, generate_cache_key,
};
use sports_hub::data_fetcher::models::{AggregateResponse, DataSource, Game, GameStatus, Sport};
use sports_hub::error::AppError;
use sports_hub::testing_utils::game_with_status;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::tempdir;

const START_MILLIS: i64 = 1_736_600_000_000;

fn memory_cache() -> (SportsCache, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START_MILLIS));
    (SportsCache::new(None, 128, clock.clone()), clock)
}

fn games(statuses: &[GameStatus]) -> AggregateResponse<Game> {
    let data = statuses
        .iter()
        .enumerate()
        .map(|(i, status)| game_with_status(&i.to_string(), Sport::Nba, *status))
        .collect();
    AggregateResponse::single(data, DataSource::new("ESPN NBA", 0.9))
}

#[tokio::test]
async fn test_value_expires_after_ttl() {
    let (cache, clock) = memory_cache();
    let value = games(&[GameStatus::Final]);

    let outcome = cache.set("sports:nba:games", &value, 60).await;
    assert_eq!(outcome, CacheWriteOutcome::Stored);

    let hit: Option<AggregateResponse<Game>> = cache.get("sports:nba:games").await;
    assert_eq!(hit, Some(value));

    clock.advance(Duration::from_secs(61));
    let miss: Option<AggregateResponse<Game>> = cache.get("sports:nba:games").await;
    assert!(miss.is_none());
}

#[test]
fn test_keys_are_deterministic_and_order_independent() {
    let a = generate_cache_key("sports", "mlb", "games", &[("date", "2025-01-11"), ("team", "CHC")]);
    let b = generate_cache_key("sports", "mlb", "games", &[("team", "CHC"), ("date", "2025-01-11")]);
    assert_eq!(a, b);
    assert_eq!(a, "sports:mlb:games?date=2025-01-11&team=CHC");

    let other_sport = generate_cache_key("sports", "nba", "games", &[("date", "2025-01-11")]);
    assert_ne!(a, other_sport);
}

#[tokio::test]
async fn test_games_ttl_depends_on_live_state() {
    let (cache, _) = memory_cache();

    let live = cache
        .wrap_detailed(&CacheOptions::new("live"), || async {
            games(&[GameStatus::Final, GameStatus::Live])
        })
        .await;
    assert_eq!(live.ttl_seconds, 30);
    assert_eq!(live.ttl_seconds, DataKind::LiveGames.ttl_seconds());

    let idle = cache
        .wrap_detailed(&CacheOptions::new("idle"), || async {
            games(&[GameStatus::Final, GameStatus::Scheduled])
        })
        .await;
    assert_eq!(idle.ttl_seconds, 300);
}

#[tokio::test]
async fn test_two_wraps_within_ten_seconds_fetch_once() {
    let (cache, clock) = memory_cache();
    let counter = AtomicUsize::new(0);
    let options = CacheOptions::new(generate_cache_key("sports", "nba", "games", &[]));

    let calls = &counter;
    let first = cache
        .wrap(&options, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            games(&[GameStatus::Final])
        })
        .await;

    clock.advance(Duration::from_secs(10));

    let second = cache
        .wrap(&options, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            games(&[GameStatus::Scheduled])
        })
        .await;

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_force_fresh_refetches_and_overwrites() {
    let (cache, _) = memory_cache();
    let options = CacheOptions::new("sports:nba:games");

    cache
        .wrap(&options, || async { games(&[GameStatus::Scheduled]) })
        .await;
    let fresh = cache
        .wrap_detailed(&options.clone().force_fresh(true), || async {
            games(&[GameStatus::Live])
        })
        .await;
    assert!(!fresh.from_cache);

    let cached = cache
        .wrap_detailed(&options, || async { games(&[GameStatus::Final]) })
        .await;
    assert!(cached.from_cache);
    assert_eq!(cached.value.data[0].status, GameStatus::Live);
}

#[tokio::test]
async fn test_file_store_survives_cache_instances() {
    let dir = tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(START_MILLIS));
    let value = games(&[GameStatus::Final]);

    {
        let store: Arc<dyn KvStore> = Arc::new(FileKvStore::new(dir.path(), clock.clone()));
        let cache = SportsCache::new(Some(store), 16, clock.clone());
        assert!(cache.set("sports:nba:games", &value, 300).await.is_stored());
    }

    let store: Arc<dyn KvStore> = Arc::new(FileKvStore::new(dir.path(), clock.clone()));
    let reopened = SportsCache::new(Some(store), 16, clock.clone());
    let hit: Option<AggregateResponse<Game>> = reopened.get("sports:nba:games").await;
    assert_eq!(hit, Some(value));

    clock.advance(Duration::from_secs(301));
    let miss: Option<AggregateResponse<Game>> = reopened.get("sports:nba:games").await;
    assert!(miss.is_none());
}

#[derive(Debug, Default)]
struct UnreachableStore {
    attempts: AtomicUsize,
}

#[async_trait]
impl KvStore for UnreachableStore {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, AppError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::cache_backend("connection refused"))
    }

    async fn put(&self, _key: &str, _value: String, _ttl: u64) -> Result<(), AppError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::cache_backend("connection refused"))
    }

    async fn delete(&self, _key: &str) -> Result<(), AppError> {
        Err(AppError::cache_backend("connection refused"))
    }
}

#[tokio::test]
async fn test_backend_outage_falls_back_to_memory() {
    let clock = Arc::new(ManualClock::new(START_MILLIS));
    let store = Arc::new(UnreachableStore::default());
    let primary: Arc<dyn KvStore> = store.clone();
    let cache = SportsCache::new(Some(primary), 16, clock);
    let options = CacheOptions::new("sports:nba:games");
    let counter = AtomicUsize::new(0);
    let calls = &counter;

    let first = cache
        .wrap_detailed(&options, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            games(&[GameStatus::Final])
        })
        .await;
    assert!(matches!(
        first.write,
        Some(CacheWriteOutcome::FallbackOnly { .. })
    ));

    let second = cache
        .wrap_detailed(&options, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            games(&[GameStatus::Final])
        })
        .await;
    assert!(second.from_cache);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(store.attempts.load(Ordering::SeqCst) >= 2);

    let stats = cache.stats().await;
    assert_eq!(stats.write_failures, 1);
    assert!(stats.backend_errors >= 1);
}

/// Shared store whose writes can be switched off while reads keep working
#[derive(Debug)]
struct WriteLockedStore {
    inner: MemoryKvStore,
    reject_puts: AtomicBool,
}

#[async_trait]
impl KvStore for WriteLockedStore {
    fn name(&self) -> &str {
        "write-locked"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: String, ttl: u64) -> Result<(), AppError> {
        if self.reject_puts.load(Ordering::SeqCst) {
            return Err(AppError::cache_backend("quota exceeded"));
        }
        self.inner.put(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.inner.delete(key).await
    }
}

#[tokio::test]
async fn test_read_after_fallback_only_write_sees_new_value() {
    let clock = Arc::new(ManualClock::new(START_MILLIS));
    let store = Arc::new(WriteLockedStore {
        inner: MemoryKvStore::new(16, clock.clone()),
        reject_puts: AtomicBool::new(false),
    });
    let primary: Arc<dyn KvStore> = store.clone();
    let cache = SportsCache::new(Some(primary.clone()), 16, clock.clone());

    assert!(cache.set("sports:nba:teams", &"v1", 300).await.is_stored());

    store.reject_puts.store(true, Ordering::SeqCst);
    let outcome = cache.set("sports:nba:teams", &"v2", 300).await;
    assert!(matches!(outcome, CacheWriteOutcome::FallbackOnly { .. }));

    let value: Option<String> = cache.get("sports:nba:teams").await;
    assert_eq!(value.as_deref(), Some("v2"));

    // Another cache on the same durable store must not see the outdated copy
    let other = SportsCache::new(Some(primary), 16, clock);
    let value: Option<String> = other.get("sports:nba:teams").await;
    assert_eq!(value, None);
}
