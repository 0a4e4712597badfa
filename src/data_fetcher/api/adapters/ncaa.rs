use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use super::{AdapterSettings, LeagueAdapter, convert_all};
use crate::data_fetcher::api::urls::{
    build_ncaa_schools_url, build_ncaa_scoreboard_url, build_ncaa_standings_url, ncaa_sport_path,
};
use crate::data_fetcher::models::ncaa::{
    NcaaGame, NcaaGameTeam, NcaaSchool, NcaaScoreboardResponse, NcaaStandingRow,
    NcaaStandingsResponse,
};
use crate::data_fetcher::models::{AggregateResponse, Game, GameStatus, Sport, Standing, Team};
use crate::data_fetcher::processors::{map_ncaa_status, parse_epoch_seconds, parse_score, start_of_day};
use crate::error::AppError;

/// NCAA scoreboard API for Division I football or men's basketball
#[derive(Debug, Clone)]
pub struct NcaaAdapter {
    name: String,
    sport: Sport,
    sport_path: &'static str,
    settings: AdapterSettings,
}

impl NcaaAdapter {
    /// Fails for sports the NCAA API does not cover
    pub fn new(sport: Sport, settings: AdapterSettings) -> Result<Self, AppError> {
        let sport_path = ncaa_sport_path(sport).ok_or_else(|| {
            AppError::config_error(format!("NCAA adapter does not support {}", sport.label()))
        })?;
        Ok(Self {
            name: format!("NCAA {}", sport.label()),
            sport,
            sport_path,
            settings,
        })
    }
}

fn convert_side(side: &NcaaGameTeam) -> Team {
    let names = &side.names;
    Team {
        id: names.seo.clone(),
        name: names.full.clone().unwrap_or_else(|| names.short.clone()),
        abbreviation: names.char6.clone().unwrap_or_else(|| names.short.clone()),
        city: String::new(),
        logo_url: None,
        conference: side.conferences.first().and_then(|c| c.conference_name.clone()),
        division: None,
    }
}

fn convert_game(game: &NcaaGame, sport: Sport, date: NaiveDate, url: &str) -> Result<Game, AppError> {
    let start_time = match game.start_time_epoch.as_deref() {
        Some(epoch) if !epoch.trim().is_empty() => parse_epoch_seconds(epoch, url)?,
        _ => start_of_day(date),
    };
    let status = map_ncaa_status(&game.game_state);

    Ok(Game {
        id: game.game_id.clone(),
        sport,
        start_time,
        status,
        home_team: convert_side(&game.home),
        away_team: convert_side(&game.away),
        home_score: parse_score(Some(&game.home.score), url)?,
        away_score: parse_score(Some(&game.away.score), url)?,
        period: match status {
            GameStatus::Live => game.current_period.clone().filter(|p| !p.is_empty()),
            _ => None,
        },
        venue: None,
        broadcast: game.network.clone().filter(|n| !n.is_empty()),
    })
}

fn convert_school(school: &NcaaSchool) -> Team {
    Team::new(
        school.slug.clone(),
        school.long.clone().unwrap_or_else(|| school.name.clone()),
        school.name.clone(),
        "",
    )
}

fn convert_row(conference: &str, row: &NcaaStandingRow, url: &str) -> Result<Standing, AppError> {
    let count = |value: &str, field: &str| {
        value.trim().parse::<u32>().map_err(|_| {
            AppError::api_unexpected_structure(
                format!("non-numeric {field} '{value}' for {}", row.school),
                url,
            )
        })
    };
    let wins = count(&row.overall_wins, "wins")?;
    let losses = count(&row.overall_losses, "losses")?;
    let win_percentage = match row.overall_pct.as_deref().map(str::trim) {
        Some(pct) if !pct.is_empty() => pct.parse::<f64>().map_err(|_| {
            AppError::api_unexpected_structure(format!("non-numeric percentage '{pct}'"), url)
        })?,
        _ => Standing::computed_win_percentage(wins, losses),
    };

    let slug = row.school.to_lowercase().replace(' ', "-");
    let mut team = Team::new(slug, row.school.clone(), row.school.clone(), "");
    team.conference = Some(conference.to_string());

    Ok(Standing {
        team,
        wins,
        losses,
        win_percentage,
        games_back: None,
        streak: row.streak.clone().filter(|s| !s.is_empty()),
    })
}

#[async_trait]
impl LeagueAdapter for NcaaAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn sport(&self) -> Sport {
        self.sport
    }

    #[instrument(skip(self), fields(provider = %self.name))]
    async fn get_teams(&self) -> Result<AggregateResponse<Team>, AppError> {
        let url = build_ncaa_schools_url(&self.settings.base_url);
        let schools: Vec<NcaaSchool> = self.settings.fetch(&self.name, &url, &[]).await?;

        let teams: Vec<Team> = schools.iter().map(convert_school).collect();
        debug!("{} returned {} schools", self.name, teams.len());
        Ok(self.settings.respond(&self.name, teams))
    }

    #[instrument(skip(self), fields(provider = %self.name))]
    async fn get_games(&self, date: NaiveDate) -> Result<AggregateResponse<Game>, AppError> {
        let url = build_ncaa_scoreboard_url(&self.settings.base_url, self.sport_path, date);
        let response: NcaaScoreboardResponse = self.settings.fetch(&self.name, &url, &[]).await?;

        let games = convert_all(&self.name, &response.games, |wrapper| {
            convert_game(&wrapper.game, self.sport, date, &url)
        })?;
        info!("{} returned {} games for {}", self.name, games.len(), date);
        Ok(self.settings.respond(&self.name, games))
    }

    /// The NCAA API only publishes current standings, so `season` is ignored
    #[instrument(skip(self), fields(provider = %self.name))]
    async fn get_standings(
        &self,
        season: Option<i32>,
    ) -> Result<AggregateResponse<Standing>, AppError> {
        if let Some(season) = season {
            debug!("{} ignores season {} and returns current standings", self.name, season);
        }
        let url = build_ncaa_standings_url(&self.settings.base_url, self.sport_path);
        let response: NcaaStandingsResponse = self.settings.fetch(&self.name, &url, &[]).await?;

        let rows: Vec<(&str, &NcaaStandingRow)> = response
            .data
            .iter()
            .flat_map(|c| c.standings.iter().map(move |row| (c.conference.as_str(), row)))
            .collect();
        let standings = convert_all(&self.name, &rows, |(conference, row)| {
            convert_row(conference, row, &url)
        })?;
        debug!("{} returned {} standings rows", self.name, standings.len());
        Ok(self.settings.respond(&self.name, standings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::fetch_utils::RetryPolicy;
    use crate::data_fetcher::api::http_client::create_test_http_client;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(server: &MockServer) -> NcaaAdapter {
        let settings = AdapterSettings::new(create_test_http_client(), server.uri(), 0.85)
            .with_retry(RetryPolicy::new(1, Duration::from_millis(1)));
        NcaaAdapter::new(Sport::Ncaab, settings).unwrap()
    }

    fn side(seo: &str, short: &str, score: &str) -> serde_json::Value {
        json!({
            "score": score,
            "names": { "char6": short.to_uppercase(), "short": short, "seo": seo, "full": format!("{short} University") },
            "conferences": [{ "conferenceName": "Big Ten" }]
        })
    }

    #[test]
    fn test_rejects_professional_leagues() {
        let settings = AdapterSettings::new(create_test_http_client(), "http://x", 0.85);
        assert!(NcaaAdapter::new(Sport::Nba, settings).is_err());
    }

    #[tokio::test]
    async fn test_scoreboard_decodes_games() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scoreboard/basketball-men/d1/2025/01/11/all-conf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "games": [
                    { "game": { "gameID": "6351", "gameState": "live", "startTimeEpoch": "1736622000",
                                "currentPeriod": "2nd", "network": "BTN",
                                "home": side("illinois", "Illinois", "41"), "away": side("purdue", "Purdue", "38") } },
                    { "game": { "gameID": "6352", "gameState": "pre", "startTimeEpoch": "",
                                "home": side("iowa", "Iowa", ""), "away": side("ohio-st", "Ohio St.", "") } }
                ]
            })))
            .mount(&server)
            .await;

        let date = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        let result = adapter(&server).get_games(date).await.unwrap();

        let live = &result.data[0];
        assert_eq!(live.status, GameStatus::Live);
        assert_eq!(live.home_team.id, "illinois");
        assert_eq!(live.home_team.conference.as_deref(), Some("Big Ten"));
        assert_eq!((live.home_score, live.away_score), (41, 38));
        assert_eq!(live.period.as_deref(), Some("2nd"));
        assert_eq!(live.start_time.timestamp(), 1_736_622_000);

        let pre = &result.data[1];
        assert_eq!(pre.status, GameStatus::Scheduled);
        assert_eq!(pre.home_score, 0);
        assert_eq!(pre.start_time, start_of_day(date));
    }

    #[tokio::test]
    async fn test_football_requests_weekly_scoreboard() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scoreboard/football/fbs/2024/14/all-conf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "games": [
                    { "game": { "gameID": "6470", "gameState": "final", "startTimeEpoch": "1732986000",
                                "home": side("michigan", "Michigan", "13"), "away": side("ohio-st", "Ohio St.", "10") } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let settings = AdapterSettings::new(create_test_http_client(), server.uri(), 0.85)
            .with_retry(RetryPolicy::new(0, Duration::from_millis(1)));
        let football = NcaaAdapter::new(Sport::Ncaaf, settings).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
        let result = football.get_games(date).await.unwrap();

        assert_eq!(result.count(), 1);
        assert_eq!(result.data[0].status, GameStatus::Final);
        assert_eq!(result.data[0].sport, Sport::Ncaaf);
    }

    #[tokio::test]
    async fn test_standings_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/standings/basketball-men/d1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "conference": "Big Ten", "standings": [
                    { "School": "Michigan State", "Overall W": "14", "Overall L": "2", "Overall PCT": "0.875", "Streak": "W5" },
                    { "School": "Iowa", "Overall W": "10", "Overall L": "6" }
                ]}]
            })))
            .mount(&server)
            .await;

        let result = adapter(&server).get_standings(Some(2025)).await.unwrap();
        assert_eq!(result.count(), 2);
        assert_eq!(result.data[0].team.id, "michigan-state");
        assert_eq!(result.data[0].team.conference.as_deref(), Some("Big Ten"));
        assert!((result.data[0].win_percentage - 0.875).abs() < 1e-9);
        assert!((result.data[1].win_percentage - 0.625).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_bad_record_fails_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "conference": "Big Ten", "standings": [
                    { "School": "Iowa", "Overall W": "ten", "Overall L": "6" }
                ]}]
            })))
            .mount(&server)
            .await;

        let err = adapter(&server).get_standings(None).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(ref e) if e.provider == "NCAA NCAAB"));
    }

    #[tokio::test]
    async fn test_schools_index() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schools-index"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "slug": "northwestern", "name": "Northwestern", "long": "Northwestern University" }
            ])))
            .mount(&server)
            .await;

        let result = adapter(&server).get_teams().await.unwrap();
        assert_eq!(result.data[0].name, "Northwestern University");
        assert_eq!(result.data[0].abbreviation, "Northwestern");
    }
}
