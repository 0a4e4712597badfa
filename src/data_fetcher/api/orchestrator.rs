//! Concurrent fan-out over league adapters with all-settle semantics

use chrono::NaiveDate;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::adapters::{
    AdapterSettings, EspnAdapter, LeagueAdapter, MlbStatsAdapter, NcaaAdapter, SportsDataIoAdapter,
};
use super::fetch_utils::RetryPolicy;
use super::http_client::create_http_client_with_timeout;
use crate::config::{Config, ProviderConfig};
use crate::constants::DEFAULT_ADAPTER_TIMEOUT_SECONDS;
use crate::data_fetcher::models::{
    AggregateResponse, Game, Sport, Standing, Team, normalize_query, validate_season,
};
use crate::data_fetcher::processors::local_today;
use crate::error::AppError;

/// Issues every adapter call concurrently and merges whatever succeeds.
///
/// A failing or slow adapter never fails the whole request: its error is
/// recorded as `"<provider>: <message>"` and its items are dropped. With no
/// successful source the result is empty with confidence 0. The only errors
/// returned are validation errors, raised before any network call.
///
/// # Example
/// ```rust,no_run
/// use sports_hub::config::Config;
/// use sports_hub::data_fetcher::api::LeagueOrchestrator;
///
/// #[tokio::main]
/// async fn main() -> Result<(), sports_hub::AppError> {
///     let config = Config::load().await?;
///     let orchestrator = LeagueOrchestrator::from_config(&config)?;
///
///     let live = orchestrator.get_live_games().await;
///     println!("{} live games, confidence {:.2}", live.count(), live.aggregated_confidence);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct LeagueOrchestrator {
    adapters: Vec<Arc<dyn LeagueAdapter>>,
    adapter_timeout: Duration,
}

impl std::fmt::Debug for LeagueOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeagueOrchestrator")
            .field(
                "adapters",
                &self.adapters.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .field("adapter_timeout", &self.adapter_timeout)
            .finish()
    }
}

impl LeagueOrchestrator {
    pub fn new(adapters: Vec<Arc<dyn LeagueAdapter>>) -> Self {
        Self {
            adapters,
            adapter_timeout: Duration::from_secs(DEFAULT_ADAPTER_TIMEOUT_SECONDS),
        }
    }

    /// Deadline for one adapter call including its retries
    pub fn with_adapter_timeout(mut self, timeout: Duration) -> Self {
        self.adapter_timeout = timeout;
        self
    }

    /// Builds the adapter set for every enabled provider in the config
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
        let retry = RetryPolicy::new(
            config.retry.max_retries,
            Duration::from_millis(config.retry.base_delay_ms),
        );
        let settings = |provider: &ProviderConfig| {
            AdapterSettings::new(client.clone(), &provider.base_url, provider.confidence)
                .with_retry(retry.clone())
        };

        let providers = &config.providers;
        let mut adapters: Vec<Arc<dyn LeagueAdapter>> = Vec::new();

        if providers.mlb_stats.enabled {
            adapters.push(Arc::new(MlbStatsAdapter::new(settings(&providers.mlb_stats))));
        }
        if providers.espn.enabled {
            for sport in &providers.espn.leagues {
                adapters.push(Arc::new(EspnAdapter::new(*sport, settings(&providers.espn))));
            }
        }
        if providers.sportsdata.enabled {
            let api_key = providers.sportsdata.api_key.as_deref().ok_or_else(|| {
                AppError::config_error("SportsDataIO is enabled but no API key is configured")
            })?;
            for sport in &providers.sportsdata.leagues {
                adapters.push(Arc::new(SportsDataIoAdapter::new(
                    *sport,
                    settings(&providers.sportsdata),
                    api_key,
                )));
            }
        }
        if providers.ncaa.enabled {
            for sport in &providers.ncaa.leagues {
                adapters.push(Arc::new(NcaaAdapter::new(*sport, settings(&providers.ncaa))?));
            }
        }

        info!(
            "Configured {} league adapters: {}",
            adapters.len(),
            adapters.iter().map(|a| a.name()).collect::<Vec<_>>().join(", ")
        );

        Ok(Self::new(adapters)
            .with_adapter_timeout(Duration::from_secs(config.adapter_timeout_seconds)))
    }

    pub fn adapters(&self) -> &[Arc<dyn LeagueAdapter>] {
        &self.adapters
    }

    /// No source is configured at all
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Runs `call` on each adapter concurrently, bounding each by the
    /// adapter deadline, and folds the settled results in adapter order.
    async fn fan_out<'a, T, F, Fut>(
        &self,
        adapters: Vec<&'a Arc<dyn LeagueAdapter>>,
        operation: &str,
        call: F,
    ) -> AggregateResponse<T>
    where
        F: Fn(&'a dyn LeagueAdapter) -> Fut,
        Fut: Future<Output = Result<AggregateResponse<T>, AppError>> + 'a,
    {
        let deadline = self.adapter_timeout;
        let calls = adapters.into_iter().map(|adapter| {
            let pending = call(adapter.as_ref());
            async move { (adapter.name(), tokio::time::timeout(deadline, pending).await) }
        });
        let settled = join_all(calls).await;

        let mut merged = AggregateResponse::default();
        for (name, outcome) in settled {
            match outcome {
                Ok(Ok(response)) => merged.merge(response),
                Ok(Err(e)) => {
                    warn!("{} failed for {}: {}", operation, name, e);
                    merged.push_error(name, e);
                }
                Err(_) => {
                    let e = AppError::upstream(
                        name,
                        None,
                        format!("request timeout after {}s", deadline.as_secs_f64()),
                    );
                    warn!("{} timed out for {}", operation, name);
                    merged.push_error(name, e);
                }
            }
        }
        merged.recompute_confidence();

        info!(
            "{}: {} items from {} sources, {} errors, confidence {:.2}",
            operation,
            merged.count(),
            merged.sources.len(),
            merged.errors.len(),
            merged.aggregated_confidence
        );
        merged
    }

    /// Games on `date` (default: today) from every adapter
    #[instrument(skip(self))]
    pub async fn get_all_games(&self, date: Option<NaiveDate>) -> AggregateResponse<Game> {
        let date = date.unwrap_or_else(local_today);
        self.fan_out(self.adapters.iter().collect(), "get_all_games", |adapter| {
            adapter.get_games(date)
        })
        .await
    }

    /// Games on `date` from the adapters covering `sport` only
    #[instrument(skip(self))]
    pub async fn get_games_for_sport(
        &self,
        sport: Sport,
        date: Option<NaiveDate>,
    ) -> AggregateResponse<Game> {
        let date = date.unwrap_or_else(local_today);
        let adapters = self
            .adapters
            .iter()
            .filter(|a| a.sport() == sport)
            .collect();
        self.fan_out(adapters, "get_games_for_sport", |adapter| {
            adapter.get_games(date)
        })
        .await
    }

    /// Standings from every adapter. A season outside the supported range
    /// is rejected before any request is made.
    #[instrument(skip(self))]
    pub async fn get_all_standings(
        &self,
        season: Option<i32>,
    ) -> Result<AggregateResponse<Standing>, AppError> {
        let season = season.map(validate_season).transpose()?;
        Ok(self.fetch_standings(season).await)
    }

    /// Standings fan-out for a season that has already been validated
    pub(crate) async fn fetch_standings(&self, season: Option<i32>) -> AggregateResponse<Standing> {
        self.fan_out(self.adapters.iter().collect(), "get_all_standings", |adapter| {
            adapter.get_standings(season)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_all_teams(&self) -> AggregateResponse<Team> {
        let merged = self
            .fan_out(self.adapters.iter().collect(), "get_all_teams", |adapter| {
                adapter.get_teams()
            })
            .await;
        // Sport-agnostic indexes (e.g. the NCAA school list) repeat per adapter
        let before = merged.count();
        let merged = merged.dedup();
        if merged.count() < before {
            debug!("Dropped {} repeated teams", before - merged.count());
        }
        merged
    }

    /// Today's games that are in progress. Source metadata and errors are
    /// those of the underlying game fan-out.
    #[instrument(skip(self))]
    pub async fn get_live_games(&self) -> AggregateResponse<Game> {
        self.get_all_games(None).await.filter(Game::is_live)
    }

    /// Case-insensitive substring search over team name, city and
    /// abbreviation across every adapter's teams, in fetch order.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<AggregateResponse<Team>, AppError> {
        let needle = normalize_query(query)?;
        Ok(self
            .get_all_teams()
            .await
            .filter(|team| team.matches_lowercase(&needle)))
    }
}
