//! TTL policy and the read-through `wrap` helper

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::{debug, instrument, trace};

use super::core::SportsCache;
use super::types::CacheWriteOutcome;
use crate::constants::cache_ttl;
use crate::data_fetcher::models::{AggregateResponse, Game, Standing, Team};

/// Volatility class of cached data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    /// Game list with at least one game in progress
    LiveGames,
    Games,
    Standings,
    Teams,
    Search,
}

impl DataKind {
    pub fn ttl_seconds(self) -> u64 {
        match self {
            DataKind::LiveGames => cache_ttl::LIVE_GAMES_SECONDS,
            DataKind::Games => cache_ttl::GAMES_SECONDS,
            DataKind::Standings => cache_ttl::STANDINGS_SECONDS,
            DataKind::Teams => cache_ttl::TEAMS_SECONDS,
            DataKind::Search => cache_ttl::SEARCH_SECONDS,
        }
    }

    /// Classifies a game list by whether any game is live
    pub fn for_games(games: &[Game]) -> Self {
        let live = games.iter().filter(|g| g.is_live()).count();
        trace!("Live games: {} of {}", live, games.len());
        if live > 0 {
            DataKind::LiveGames
        } else {
            DataKind::Games
        }
    }
}

/// A value the cache may store, with its TTL derived from the value itself
pub trait Cacheable: Serialize + DeserializeOwned {
    fn ttl_seconds(&self) -> u64;

    /// Whether this value may be written back at all
    fn should_store(&self) -> bool {
        true
    }
}

impl Cacheable for AggregateResponse<Game> {
    fn ttl_seconds(&self) -> u64 {
        DataKind::for_games(&self.data).ttl_seconds()
    }

    fn should_store(&self) -> bool {
        !self.is_total_failure()
    }
}

impl Cacheable for AggregateResponse<Standing> {
    fn ttl_seconds(&self) -> u64 {
        DataKind::Standings.ttl_seconds()
    }

    fn should_store(&self) -> bool {
        !self.is_total_failure()
    }
}

impl Cacheable for AggregateResponse<Team> {
    fn ttl_seconds(&self) -> u64 {
        DataKind::Teams.ttl_seconds()
    }

    fn should_store(&self) -> bool {
        !self.is_total_failure()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    pub key: String,
    /// Overrides the TTL the value would pick for itself
    pub ttl_seconds: Option<u64>,
    /// Skip the read but still write the fresh value
    pub force_fresh: bool,
}

impl CacheOptions {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ttl_seconds: None,
            force_fresh: false,
        }
    }

    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = Some(ttl_seconds);
        self
    }

    pub fn force_fresh(mut self, force_fresh: bool) -> Self {
        self.force_fresh = force_fresh;
        self
    }
}

/// Value returned by [`SportsCache::wrap_detailed`]
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    pub from_cache: bool,
    /// Seconds the value stays fresh from now: the remaining TTL on a hit,
    /// the applied TTL on a stored miss, 0 when nothing was stored
    pub ttl_seconds: u64,
    /// Write result on a miss, `None` on a hit
    pub write: Option<CacheWriteOutcome>,
}

impl SportsCache {
    /// Read-through wrapper: returns the cached value for `options.key` or
    /// calls `fetcher`, stores its result and returns it.
    pub async fn wrap<T, F, Fut>(&self, options: &CacheOptions, fetcher: F) -> T
    where
        T: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.wrap_detailed(options, fetcher).await.value
    }

    /// Like [`wrap`](Self::wrap) but also reports where the value came from
    /// and how long it stays fresh
    #[instrument(skip(self, fetcher), fields(key = %options.key, force_fresh = options.force_fresh))]
    pub async fn wrap_detailed<T, F, Fut>(&self, options: &CacheOptions, fetcher: F) -> Cached<T>
    where
        T: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if !options.force_fresh
            && let Some(entry) = self.get_entry::<T>(&options.key).await
        {
            let ttl_seconds = entry.remaining_ttl_seconds(self.clock().now_millis());
            return Cached {
                value: entry.value,
                from_cache: true,
                ttl_seconds,
                write: None,
            };
        }

        let value = fetcher().await;

        if !value.should_store() {
            debug!("Not caching value for key={}", options.key);
            return Cached {
                value,
                from_cache: false,
                ttl_seconds: 0,
                write: Some(CacheWriteOutcome::Skipped {
                    reason: "value is not cacheable".to_string(),
                }),
            };
        }

        let ttl = options.ttl_seconds.unwrap_or_else(|| value.ttl_seconds());
        let write = self.set(&options.key, &value, ttl).await;
        let ttl_seconds = match write {
            CacheWriteOutcome::Skipped { .. } => 0,
            _ => ttl,
        };

        Cached {
            value,
            from_cache: false,
            ttl_seconds,
            write: Some(write),
        }
    }
}
