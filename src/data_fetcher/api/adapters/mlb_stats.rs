use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, instrument};

use super::{AdapterSettings, LeagueAdapter, convert_all, team_field};
use crate::data_fetcher::api::urls::{
    build_mlb_schedule_url, build_mlb_standings_url, build_mlb_teams_url,
};
use crate::data_fetcher::models::mlb::{
    MlbGame, MlbScheduleResponse, MlbStandingsResponse, MlbTeam, MlbTeamRecord, MlbTeamsResponse,
};
use crate::data_fetcher::models::{AggregateResponse, Game, GameStatus, Sport, Standing, Team};
use crate::data_fetcher::processors::{map_mlb_status, parse_timestamp};
use crate::error::AppError;

const PROVIDER: &str = "MLB Stats";

/// Official MLB Stats API. Highest-confidence MLB source.
#[derive(Debug, Clone)]
pub struct MlbStatsAdapter {
    settings: AdapterSettings,
}

impl MlbStatsAdapter {
    pub fn new(settings: AdapterSettings) -> Self {
        Self { settings }
    }
}

fn convert_team(team: &MlbTeam) -> Team {
    let id = team.id.to_string();
    Team {
        abbreviation: team_field(PROVIDER, &id, "abbreviation", team.abbreviation.as_deref()),
        city: team_field(PROVIDER, &id, "locationName", team.location_name.as_deref()),
        id,
        name: team.name.clone(),
        logo_url: None,
        conference: team.league.as_ref().and_then(|l| l.name.clone()),
        division: team.division.as_ref().and_then(|d| d.name.clone()),
    }
}

fn convert_game(game: &MlbGame, url: &str) -> Result<Game, AppError> {
    let status = map_mlb_status(
        &game.status.abstract_game_state,
        game.status.detailed_state.as_deref(),
    );
    // "Top 5th" while in progress
    let period = match (status, &game.linescore) {
        (GameStatus::Live, Some(linescore)) => match (
            linescore.inning_half.as_deref(),
            linescore.current_inning_ordinal.as_deref(),
        ) {
            (Some(half), Some(inning)) => Some(format!("{half} {inning}")),
            (None, Some(inning)) => Some(inning.to_string()),
            _ => None,
        },
        _ => None,
    };

    Ok(Game {
        id: game.game_pk.to_string(),
        sport: Sport::Mlb,
        start_time: parse_timestamp(&game.game_date, url)?,
        status,
        home_team: convert_team(&game.teams.home.team),
        away_team: convert_team(&game.teams.away.team),
        home_score: game.teams.home.score.unwrap_or(0),
        away_score: game.teams.away.score.unwrap_or(0),
        period,
        venue: game.venue.as_ref().and_then(|v| v.name.clone()),
        broadcast: game.broadcasts.iter().find_map(|b| b.name.clone()),
    })
}

/// Parses ".600" style percentages and "2.5" / "-" games-back values
fn parse_decimal(value: &str, field: &str, url: &str) -> Result<f64, AppError> {
    match value.trim() {
        "-" | "" => Ok(0.0),
        text => text.parse::<f64>().map_err(|_| {
            AppError::api_unexpected_structure(format!("non-numeric {field} '{text}'"), url)
        }),
    }
}

fn convert_record(
    division: Option<&str>,
    record: &MlbTeamRecord,
    url: &str,
) -> Result<Standing, AppError> {
    let mut team = convert_team(&record.team);
    if team.division.is_none() {
        team.division = division.map(str::to_string);
    }

    let win_percentage = match &record.winning_percentage {
        Some(pct) => parse_decimal(pct, "winning percentage", url)?,
        None => Standing::computed_win_percentage(record.wins, record.losses),
    };
    let games_back = record
        .games_back
        .as_deref()
        .map(|gb| parse_decimal(gb, "games back", url))
        .transpose()?;

    Ok(Standing {
        team,
        wins: record.wins,
        losses: record.losses,
        win_percentage,
        games_back,
        streak: record.streak.as_ref().and_then(|s| s.streak_code.clone()),
    })
}

#[async_trait]
impl LeagueAdapter for MlbStatsAdapter {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn sport(&self) -> Sport {
        Sport::Mlb
    }

    #[instrument(skip(self))]
    async fn get_teams(&self) -> Result<AggregateResponse<Team>, AppError> {
        let season = Sport::Mlb.current_season(Utc::now().date_naive());
        let url = build_mlb_teams_url(&self.settings.base_url, season);
        let response: MlbTeamsResponse = self.settings.fetch(PROVIDER, &url, &[]).await?;

        let teams: Vec<Team> = response.teams.iter().map(convert_team).collect();
        debug!("{} returned {} teams", PROVIDER, teams.len());
        Ok(self.settings.respond(PROVIDER, teams))
    }

    #[instrument(skip(self))]
    async fn get_games(&self, date: NaiveDate) -> Result<AggregateResponse<Game>, AppError> {
        let url = build_mlb_schedule_url(&self.settings.base_url, date);
        let response: MlbScheduleResponse = self.settings.fetch(PROVIDER, &url, &[]).await?;

        let wire_games: Vec<&MlbGame> = response.dates.iter().flat_map(|d| d.games.iter()).collect();
        let games = convert_all(PROVIDER, &wire_games, |game| convert_game(game, &url))?;

        info!("{} returned {} games for {}", PROVIDER, games.len(), date);
        Ok(self.settings.respond(PROVIDER, games))
    }

    #[instrument(skip(self))]
    async fn get_standings(
        &self,
        season: Option<i32>,
    ) -> Result<AggregateResponse<Standing>, AppError> {
        let season = season.unwrap_or_else(|| Sport::Mlb.current_season(Utc::now().date_naive()));
        let url = build_mlb_standings_url(&self.settings.base_url, season);
        let response: MlbStandingsResponse = self.settings.fetch(PROVIDER, &url, &[]).await?;

        let rows: Vec<(Option<&str>, &MlbTeamRecord)> = response
            .records
            .iter()
            .flat_map(|record| {
                let division = record.division.as_ref().and_then(|d| d.name.as_deref());
                record.team_records.iter().map(move |r| (division, r))
            })
            .collect();
        let standings = convert_all(PROVIDER, &rows, |(division, record)| {
            convert_record(*division, record, &url)
        })?;

        debug!("{} returned {} standings rows", PROVIDER, standings.len());
        Ok(self.settings.respond(PROVIDER, standings))
    }
}
