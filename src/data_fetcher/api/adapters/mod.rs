//! League adapters: one per upstream provider and league
//!
//! An adapter turns provider JSON into canonical [`Team`], [`Game`] and
//! [`Standing`] values. Every call either returns a single-source
//! [`AggregateResponse`] or fails with [`AppError::Upstream`]; adapters never
//! cache and never return partially decoded data.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use super::fetch_utils::{RetryPolicy, fetch_json};
use crate::data_fetcher::models::{AggregateResponse, DataSource, Game, Sport, Standing, Team};
use crate::error::AppError;

pub mod espn;
pub mod mlb_stats;
pub mod ncaa;
pub mod sportsdata;

pub use espn::EspnAdapter;
pub use mlb_stats::MlbStatsAdapter;
pub use ncaa::NcaaAdapter;
pub use sportsdata::SportsDataIoAdapter;

/// Trait every league data provider implements.
#[async_trait]
pub trait LeagueAdapter: Send + Sync {
    /// Provider label used in `DataSource` entries and error strings, e.g. "ESPN NBA"
    fn name(&self) -> &str;

    fn sport(&self) -> Sport;

    async fn get_teams(&self) -> Result<AggregateResponse<Team>, AppError>;

    async fn get_games(&self, date: NaiveDate) -> Result<AggregateResponse<Game>, AppError>;

    /// `None` asks for the current season
    async fn get_standings(
        &self,
        season: Option<i32>,
    ) -> Result<AggregateResponse<Standing>, AppError>;
}

/// Connection settings shared by the HTTP adapters
#[derive(Debug, Clone)]
pub struct AdapterSettings {
    pub client: Client,
    pub base_url: String,
    pub confidence: f64,
    pub retry: RetryPolicy,
}

impl AdapterSettings {
    pub fn new(client: Client, base_url: impl Into<String>, confidence: f64) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            confidence,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetches and decodes `url`, attributing any failure to `provider`
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        provider: &str,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<T, AppError> {
        fetch_json(&self.client, url, headers, &self.retry)
            .await
            .map_err(|e| {
                error!("{} request failed after retries: {}", provider, e);
                e.into_upstream(provider)
            })
    }

    pub(crate) fn respond<T>(&self, provider: &str, data: Vec<T>) -> AggregateResponse<T> {
        AggregateResponse::single(data, DataSource::new(provider, self.confidence))
    }
}

/// Converts every wire item or fails the whole call on the first bad one
pub(crate) fn convert_all<W, T, F>(provider: &str, items: &[W], convert: F) -> Result<Vec<T>, AppError>
where
    F: Fn(&W) -> Result<T, AppError>,
{
    items
        .iter()
        .map(|item| convert(item).map_err(|e| e.into_upstream(provider)))
        .collect()
}

/// Optional team text field; a missing value becomes empty and is logged
pub(crate) fn team_field(provider: &str, team_id: &str, field: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => {
            debug!("{} sent no {} for team {}", provider, field, team_id);
            String::new()
        }
    }
}
