//! Orchestrator calls wrapped in the TTL cache policy

use chrono::NaiveDate;
use tracing::{debug, instrument};

use super::orchestrator::LeagueOrchestrator;
use crate::config::Config;
use crate::constants::DEFAULT_CACHE_NAMESPACE;
use crate::data_fetcher::cache::{CacheOptions, Cached, DataKind, SportsCache, generate_cache_key};
use crate::data_fetcher::models::{
    AggregateResponse, Game, Sport, Standing, Team, normalize_query, validate_season,
};
use crate::data_fetcher::processors::local_today;
use crate::error::AppError;

const ALL_SPORTS: &str = "all";

/// [`LeagueOrchestrator`] behind a [`SportsCache`].
///
/// Each operation maps to one cache key built with [`generate_cache_key`]
/// and reports the TTL it applied so callers can emit a matching
/// `Cache-Control: max-age`. Inputs are validated before the cache is read.
#[derive(Debug, Clone)]
pub struct CachedOrchestrator {
    orchestrator: LeagueOrchestrator,
    cache: SportsCache,
    namespace: String,
}

impl CachedOrchestrator {
    pub fn new(orchestrator: LeagueOrchestrator, cache: SportsCache) -> Self {
        Self {
            orchestrator,
            cache,
            namespace: DEFAULT_CACHE_NAMESPACE.to_string(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Ok(Self::new(
            LeagueOrchestrator::from_config(config)?,
            SportsCache::from_config(config),
        )
        .with_namespace(config.cache.namespace.clone()))
    }

    pub fn orchestrator(&self) -> &LeagueOrchestrator {
        &self.orchestrator
    }

    pub fn cache(&self) -> &SportsCache {
        &self.cache
    }

    fn key(&self, sport: &str, endpoint: &str, params: &[(&str, &str)]) -> String {
        generate_cache_key(&self.namespace, sport, endpoint, params)
    }

    #[instrument(skip(self))]
    pub async fn get_all_games(
        &self,
        date: Option<NaiveDate>,
        force_fresh: bool,
    ) -> Cached<AggregateResponse<Game>> {
        let date = date.unwrap_or_else(local_today);
        let day = date.format("%Y-%m-%d").to_string();
        let options =
            CacheOptions::new(self.key(ALL_SPORTS, "games", &[("date", &day)])).force_fresh(force_fresh);

        self.cache
            .wrap_detailed(&options, || self.orchestrator.get_all_games(Some(date)))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_games_for_sport(
        &self,
        sport: Sport,
        date: Option<NaiveDate>,
        force_fresh: bool,
    ) -> Cached<AggregateResponse<Game>> {
        let date = date.unwrap_or_else(local_today);
        let day = date.format("%Y-%m-%d").to_string();
        let options = CacheOptions::new(self.key(sport.as_str(), "games", &[("date", &day)]))
            .force_fresh(force_fresh);

        self.cache
            .wrap_detailed(&options, || {
                self.orchestrator.get_games_for_sport(sport, Some(date))
            })
            .await
    }

    /// Shares the cache entry of today's full game list and filters it, so
    /// the live view is never staler than the games view
    #[instrument(skip(self))]
    pub async fn get_live_games(&self, force_fresh: bool) -> Cached<AggregateResponse<Game>> {
        let all = self.get_all_games(None, force_fresh).await;
        debug!("Filtering {} games for live status", all.value.count());
        Cached {
            value: all.value.filter(Game::is_live),
            ..all
        }
    }

    #[instrument(skip(self))]
    pub async fn get_all_standings(
        &self,
        season: Option<i32>,
        force_fresh: bool,
    ) -> Result<Cached<AggregateResponse<Standing>>, AppError> {
        let season = season.map(validate_season).transpose()?;
        let season_param = season.map(|s| s.to_string());
        let params: Vec<(&str, &str)> = season_param
            .as_deref()
            .map(|s| vec![("season", s)])
            .unwrap_or_default();
        let options =
            CacheOptions::new(self.key(ALL_SPORTS, "standings", &params)).force_fresh(force_fresh);

        let cached = self
            .cache
            .wrap_detailed(&options, || self.orchestrator.fetch_standings(season))
            .await;
        Ok(cached)
    }

    #[instrument(skip(self))]
    pub async fn get_all_teams(&self, force_fresh: bool) -> Cached<AggregateResponse<Team>> {
        let options = CacheOptions::new(self.key(ALL_SPORTS, "teams", &[])).force_fresh(force_fresh);
        self.cache
            .wrap_detailed(&options, || self.orchestrator.get_all_teams())
            .await
    }

    /// Search results are cached per normalized query. The team lists they
    /// are built from are cached separately under the teams key.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        force_fresh: bool,
    ) -> Result<Cached<AggregateResponse<Team>>, AppError> {
        let needle = normalize_query(query)?;
        let options = CacheOptions::new(self.key(ALL_SPORTS, "search", &[("q", &needle)]))
            .with_ttl(DataKind::Search.ttl_seconds())
            .force_fresh(force_fresh);

        let cached = self
            .cache
            .wrap_detailed(&options, || async {
                self.get_all_teams(force_fresh)
                    .await
                    .value
                    .filter(|team| team.matches_lowercase(&needle))
            })
            .await;
        Ok(cached)
    }
}
