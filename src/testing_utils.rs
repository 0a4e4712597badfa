//! Scripted adapters and fixture builders for tests

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::data_fetcher::api::LeagueAdapter;
use crate::data_fetcher::models::{
    AggregateResponse, DataSource, Game, GameStatus, Sport, Standing, Team,
};
use crate::error::AppError;

/// Builds a team with no logo, conference or division
pub fn team(id: &str, name: &str, abbreviation: &str, city: &str) -> Team {
    Team::new(id, name, abbreviation, city)
}

/// A game on 2025-01-11 between two placeholder teams
pub fn game_with_status(id: &str, sport: Sport, status: GameStatus) -> Game {
    let (home_score, away_score) = match status {
        GameStatus::Scheduled | GameStatus::Postponed | GameStatus::Cancelled => (0, 0),
        _ => (3, 2),
    };
    Game {
        id: id.to_string(),
        sport,
        start_time: Utc
            .with_ymd_and_hms(2025, 1, 11, 19, 0, 0)
            .single()
            .unwrap_or_default(),
        status,
        home_team: team(&format!("{id}-home"), "Home Team", "HOM", "Home City"),
        away_team: team(&format!("{id}-away"), "Away Team", "AWY", "Away City"),
        home_score,
        away_score,
        period: (status == GameStatus::Live).then(|| "2nd".to_string()),
        venue: None,
        broadcast: None,
    }
}

pub fn standing(team: Team, wins: u32, losses: u32) -> Standing {
    Standing {
        team,
        wins,
        losses,
        win_percentage: Standing::computed_win_percentage(wins, losses),
        games_back: None,
        streak: None,
    }
}

/// Adapter answering every call from fixed data. Clones share the call counter.
#[derive(Debug, Clone)]
pub struct StaticAdapter {
    name: String,
    sport: Sport,
    confidence: f64,
    games: Vec<Game>,
    teams: Vec<Team>,
    standings: Vec<Standing>,
    calls: Arc<AtomicUsize>,
}

impl StaticAdapter {
    pub fn new(name: &str, sport: Sport, confidence: f64) -> Self {
        Self {
            name: name.to_string(),
            sport,
            confidence,
            games: Vec::new(),
            teams: Vec::new(),
            standings: Vec::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_games(mut self, games: Vec<Game>) -> Self {
        self.games = games;
        self
    }

    pub fn with_teams(mut self, teams: Vec<Team>) -> Self {
        self.teams = teams;
        self
    }

    pub fn with_standings(mut self, standings: Vec<Standing>) -> Self {
        self.standings = standings;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond<T: Clone>(&self, data: &[T]) -> Result<AggregateResponse<T>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AggregateResponse::single(
            data.to_vec(),
            DataSource::new(&self.name, self.confidence),
        ))
    }
}

#[async_trait]
impl LeagueAdapter for StaticAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn sport(&self) -> Sport {
        self.sport
    }

    async fn get_teams(&self) -> Result<AggregateResponse<Team>, AppError> {
        self.respond(&self.teams)
    }

    async fn get_games(&self, _date: NaiveDate) -> Result<AggregateResponse<Game>, AppError> {
        self.respond(&self.games)
    }

    async fn get_standings(
        &self,
        _season: Option<i32>,
    ) -> Result<AggregateResponse<Standing>, AppError> {
        self.respond(&self.standings)
    }
}

/// Adapter failing every call with the same upstream error
#[derive(Debug, Clone)]
pub struct FailingAdapter {
    name: String,
    sport: Sport,
    status: Option<u16>,
    message: String,
    calls: Arc<AtomicUsize>,
}

impl FailingAdapter {
    pub fn new(name: &str, sport: Sport, status: Option<u16>, message: &str) -> Self {
        Self {
            name: name.to_string(),
            sport,
            status,
            message: message.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<AggregateResponse<T>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::upstream(&self.name, self.status, &self.message))
    }
}

#[async_trait]
impl LeagueAdapter for FailingAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn sport(&self) -> Sport {
        self.sport
    }

    async fn get_teams(&self) -> Result<AggregateResponse<Team>, AppError> {
        self.fail()
    }

    async fn get_games(&self, _date: NaiveDate) -> Result<AggregateResponse<Game>, AppError> {
        self.fail()
    }

    async fn get_standings(
        &self,
        _season: Option<i32>,
    ) -> Result<AggregateResponse<Standing>, AppError> {
        self.fail()
    }
}

/// Adapter that never answers, for exercising the orchestrator deadline
#[derive(Debug, Clone)]
pub struct HangingAdapter {
    name: String,
    sport: Sport,
}

impl HangingAdapter {
    pub fn new(name: &str, sport: Sport) -> Self {
        Self {
            name: name.to_string(),
            sport,
        }
    }

    async fn hang<T>(&self) -> Result<AggregateResponse<T>, AppError> {
        std::future::pending::<()>().await;
        Ok(AggregateResponse::default())
    }
}

#[async_trait]
impl LeagueAdapter for HangingAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn sport(&self) -> Sport {
        self.sport
    }

    async fn get_teams(&self) -> Result<AggregateResponse<Team>, AppError> {
        self.hang().await
    }

    async fn get_games(&self, _date: NaiveDate) -> Result<AggregateResponse<Game>, AppError> {
        self.hang().await
    }

    async fn get_standings(
        &self,
        _season: Option<i32>,
    ) -> Result<AggregateResponse<Standing>, AppError> {
        self.hang().await
    }
}
