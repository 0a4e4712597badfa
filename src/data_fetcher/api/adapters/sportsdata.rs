use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, instrument};

use super::{AdapterSettings, LeagueAdapter, convert_all, team_field};
use crate::constants::providers::SPORTSDATA_KEY_HEADER;
use crate::data_fetcher::api::urls::{
    build_sportsdata_games_url, build_sportsdata_standings_url, build_sportsdata_teams_url,
};
use crate::data_fetcher::models::sportsdata::{SdGame, SdStanding, SdTeam};
use crate::data_fetcher::models::{AggregateResponse, Game, GameStatus, Sport, Standing, Team};
use crate::data_fetcher::processors::{map_sportsdata_status, parse_timestamp};
use crate::error::AppError;

/// SportsDataIO v3 scores feed for one league. Requires a subscription key.
#[derive(Debug, Clone)]
pub struct SportsDataIoAdapter {
    name: String,
    sport: Sport,
    settings: AdapterSettings,
    api_key: String,
}

impl SportsDataIoAdapter {
    pub fn new(sport: Sport, settings: AdapterSettings, api_key: impl Into<String>) -> Self {
        Self {
            name: format!("SportsDataIO {}", sport.label()),
            sport,
            settings,
            api_key: api_key.into(),
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        self.settings
            .fetch(&self.name, url, &[(SPORTSDATA_KEY_HEADER, self.api_key.as_str())])
            .await
    }

    fn season_or_current(&self, season: Option<i32>) -> i32 {
        season.unwrap_or_else(|| self.sport.current_season(Utc::now().date_naive()))
    }
}

/// Game rows only carry team keys; the key doubles as name and abbreviation
fn team_from_key(key: &str, id: Option<i64>) -> Team {
    let id = id.map(|id| id.to_string()).unwrap_or_else(|| key.to_string());
    Team::new(id, key, key, "")
}

fn convert_game(game: &SdGame, sport: Sport, url: &str) -> Result<Game, AppError> {
    let id = game
        .id()
        .ok_or_else(|| AppError::api_unexpected_structure("game row without GameID", url))?;
    let kickoff = game
        .date_time_utc
        .as_deref()
        .or(game.day.as_deref())
        .ok_or_else(|| {
            AppError::api_unexpected_structure(format!("game {id} has no start time"), url)
        })?;

    let status = game
        .status
        .as_deref()
        .map(map_sportsdata_status)
        .unwrap_or_default();
    let period = match status {
        GameStatus::Live => game.quarter.as_ref().map(|q| q.to_display()),
        _ => None,
    };

    Ok(Game {
        start_time: parse_timestamp(kickoff, url)?,
        sport,
        status,
        home_team: team_from_key(&game.home_team, game.home_team_id),
        away_team: team_from_key(&game.away_team, game.away_team_id),
        home_score: game.home_points(),
        away_score: game.away_points(),
        period,
        venue: game.stadium_name.clone(),
        broadcast: game.channel.clone(),
        id,
    })
}

fn convert_team(team: &SdTeam) -> Team {
    let id = team.team_id.to_string();
    Team {
        city: team_field("SportsDataIO", &id, "City", team.city.as_deref()),
        id,
        name: team.name.clone(),
        abbreviation: team.key.clone(),
        logo_url: team.wikipedia_logo_url.clone(),
        conference: team.conference.clone(),
        division: team.division.clone(),
    }
}

fn convert_standing(row: &SdStanding) -> Standing {
    let id = row.team_id.to_string();
    Standing {
        team: Team {
            city: team_field("SportsDataIO", &id, "City", row.city.as_deref()),
            id,
            name: row.name.clone(),
            abbreviation: row.key.clone(),
            logo_url: None,
            conference: row.conference.clone(),
            division: row.division.clone(),
        },
        wins: row.wins,
        losses: row.losses,
        win_percentage: row
            .percentage
            .unwrap_or_else(|| Standing::computed_win_percentage(row.wins, row.losses)),
        games_back: row.games_behind,
        streak: row.streak_description.clone(),
    }
}

#[async_trait]
impl LeagueAdapter for SportsDataIoAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn sport(&self) -> Sport {
        self.sport
    }

    #[instrument(skip(self), fields(provider = %self.name))]
    async fn get_teams(&self) -> Result<AggregateResponse<Team>, AppError> {
        let url = build_sportsdata_teams_url(&self.settings.base_url, self.sport);
        let rows: Vec<SdTeam> = self.fetch(&url).await?;

        let teams: Vec<Team> = rows.iter().map(convert_team).collect();
        debug!("{} returned {} teams", self.name, teams.len());
        Ok(self.settings.respond(&self.name, teams))
    }

    #[instrument(skip(self), fields(provider = %self.name))]
    async fn get_games(&self, date: NaiveDate) -> Result<AggregateResponse<Game>, AppError> {
        let url = build_sportsdata_games_url(&self.settings.base_url, self.sport, date);
        let rows: Vec<SdGame> = self.fetch(&url).await?;

        let games = convert_all(&self.name, &rows, |row| convert_game(row, self.sport, &url))?;
        info!("{} returned {} games for {}", self.name, games.len(), date);
        Ok(self.settings.respond(&self.name, games))
    }

    #[instrument(skip(self), fields(provider = %self.name))]
    async fn get_standings(
        &self,
        season: Option<i32>,
    ) -> Result<AggregateResponse<Standing>, AppError> {
        let season = self.season_or_current(season);
        let url = build_sportsdata_standings_url(&self.settings.base_url, self.sport, season);
        let rows: Vec<SdStanding> = self.fetch(&url).await?;

        let standings: Vec<Standing> = rows.iter().map(convert_standing).collect();
        debug!("{} returned {} standings rows", self.name, standings.len());
        Ok(self.settings.respond(&self.name, standings))
    }
}
