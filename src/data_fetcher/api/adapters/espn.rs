use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use super::{AdapterSettings, LeagueAdapter, convert_all, team_field};
use crate::data_fetcher::api::urls::{
    build_espn_scoreboard_url, build_espn_standings_url, build_espn_teams_url,
};
use crate::data_fetcher::models::espn::{
    EspnEvent, EspnScoreboardResponse, EspnStandingsEntry, EspnStandingsGroup, EspnTeam,
    EspnTeamsResponse,
};
use crate::data_fetcher::models::{AggregateResponse, Game, GameStatus, Sport, Standing, Team};
use crate::data_fetcher::processors::{map_espn_status, parse_score, parse_timestamp};
use crate::error::AppError;

/// ESPN public JSON API for one league
#[derive(Debug, Clone)]
pub struct EspnAdapter {
    name: String,
    sport: Sport,
    settings: AdapterSettings,
}

impl EspnAdapter {
    pub fn new(sport: Sport, settings: AdapterSettings) -> Self {
        Self {
            name: format!("ESPN {}", sport.label()),
            sport,
            settings,
        }
    }
}

fn convert_team(team: &EspnTeam) -> Team {
    Team {
        id: team.id.clone(),
        name: team.display_name.clone(),
        abbreviation: team_field("ESPN", &team.id, "abbreviation", team.abbreviation.as_deref()),
        city: team_field("ESPN", &team.id, "location", team.location.as_deref()),
        logo_url: team.logo_url(),
        conference: None,
        division: None,
    }
}

fn convert_event(event: &EspnEvent, sport: Sport, url: &str) -> Result<Game, AppError> {
    let competition = event.competitions.first().ok_or_else(|| {
        AppError::api_unexpected_structure(format!("event {} has no competition", event.id), url)
    })?;

    let side = |home_away: &str| {
        competition
            .competitors
            .iter()
            .find(|c| c.home_away == home_away)
            .ok_or_else(|| {
                AppError::api_unexpected_structure(
                    format!("event {} has no {home_away} competitor", event.id),
                    url,
                )
            })
    };
    let home = side("home")?;
    let away = side("away")?;

    let status_type = &event.status.status_type;
    let status = map_espn_status(&status_type.name, status_type.state.as_deref());
    let period = match status {
        GameStatus::Live => status_type
            .detail
            .clone()
            .or_else(|| event.status.period.map(|p| p.to_string())),
        _ => None,
    };

    Ok(Game {
        id: event.id.clone(),
        sport,
        start_time: parse_timestamp(&event.date, url)?,
        status,
        home_team: convert_team(&home.team),
        away_team: convert_team(&away.team),
        home_score: parse_score(home.score.as_deref(), url)?,
        away_score: parse_score(away.score.as_deref(), url)?,
        period,
        venue: competition.venue.as_ref().and_then(|v| v.full_name.clone()),
        broadcast: competition
            .broadcasts
            .iter()
            .flat_map(|b| b.names.iter())
            .next()
            .cloned(),
    })
}

/// Flattens nested conference/division groups into `(division, entry)` pairs
fn collect_entries<'a>(
    group: &'a EspnStandingsGroup,
    out: &mut Vec<(Option<&'a str>, &'a EspnStandingsEntry)>,
) {
    if let Some(table) = &group.standings {
        for entry in &table.entries {
            out.push((group.name.as_deref(), entry));
        }
    }
    for child in &group.children {
        collect_entries(child, out);
    }
}

fn convert_standing(
    division: Option<&str>,
    entry: &EspnStandingsEntry,
    url: &str,
) -> Result<Standing, AppError> {
    let count = |name: &str| -> Result<u32, AppError> {
        entry
            .stat(name)
            .and_then(|s| s.value)
            .filter(|v| *v >= 0.0)
            .map(|v| v as u32)
            .ok_or_else(|| {
                AppError::api_unexpected_structure(
                    format!("standing for team {} lacks '{name}'", entry.team.id),
                    url,
                )
            })
    };
    let wins = count("wins")?;
    let losses = count("losses")?;

    let mut team = convert_team(&entry.team);
    team.division = division.map(str::to_string);

    Ok(Standing {
        team,
        wins,
        losses,
        win_percentage: entry
            .stat("winPercent")
            .and_then(|s| s.value)
            .unwrap_or_else(|| Standing::computed_win_percentage(wins, losses)),
        games_back: entry.stat("gamesBehind").and_then(|s| s.value),
        streak: entry.stat("streak").and_then(|s| s.display_value.clone()),
    })
}

#[async_trait]
impl LeagueAdapter for EspnAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn sport(&self) -> Sport {
        self.sport
    }

    #[instrument(skip(self), fields(provider = %self.name))]
    async fn get_teams(&self) -> Result<AggregateResponse<Team>, AppError> {
        let url = build_espn_teams_url(&self.settings.base_url, self.sport);
        let response: EspnTeamsResponse = self.settings.fetch(&self.name, &url, &[]).await?;

        let teams: Vec<Team> = response
            .sports
            .iter()
            .flat_map(|s| s.leagues.iter())
            .flat_map(|l| l.teams.iter())
            .map(|w| convert_team(&w.team))
            .collect();

        debug!("{} returned {} teams", self.name, teams.len());
        Ok(self.settings.respond(&self.name, teams))
    }

    #[instrument(skip(self), fields(provider = %self.name))]
    async fn get_games(&self, date: NaiveDate) -> Result<AggregateResponse<Game>, AppError> {
        let url = build_espn_scoreboard_url(&self.settings.base_url, self.sport, date);
        let response: EspnScoreboardResponse = self.settings.fetch(&self.name, &url, &[]).await?;

        let games = convert_all(&self.name, &response.events, |event| {
            convert_event(event, self.sport, &url)
        })?;

        info!("{} returned {} games for {}", self.name, games.len(), date);
        Ok(self.settings.respond(&self.name, games))
    }

    #[instrument(skip(self), fields(provider = %self.name))]
    async fn get_standings(
        &self,
        season: Option<i32>,
    ) -> Result<AggregateResponse<Standing>, AppError> {
        let url = build_espn_standings_url(&self.settings.base_url, self.sport, season);
        let root: EspnStandingsGroup = self.settings.fetch(&self.name, &url, &[]).await?;

        let mut entries = Vec::new();
        collect_entries(&root, &mut entries);
        let standings = convert_all(&self.name, &entries, |(division, entry)| {
            convert_standing(*division, entry, &url)
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
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(server: &MockServer, sport: Sport) -> EspnAdapter {
        let settings = AdapterSettings::new(create_test_http_client(), server.uri(), 0.9)
            .with_retry(RetryPolicy::new(2, Duration::from_millis(1)));
        EspnAdapter::new(sport, settings)
    }

    fn competitor(home_away: &str, id: &str, name: &str, abbr: &str, score: &str) -> serde_json::Value {
        json!({
            "homeAway": home_away,
            "score": score,
            "team": {
                "id": id,
                "displayName": name,
                "abbreviation": abbr,
                "location": name.split(' ').next().unwrap(),
                "logo": format!("https://a.espncdn.com/{abbr}.png")
            }
        })
    }

    fn event(id: &str, status_name: &str, state: &str) -> serde_json::Value {
        json!({
            "id": id,
            "date": "2025-01-12T00:30Z",
            "status": {
                "period": 3,
                "displayClock": "4:12",
                "type": { "name": status_name, "state": state, "detail": "4:12 - 3rd Quarter" }
            },
            "competitions": [{
                "competitors": [
                    competitor("home", "4", "Chicago Bulls", "CHI", "78"),
                    competitor("away", "2", "Boston Celtics", "BOS", "81")
                ],
                "venue": { "fullName": "United Center" },
                "broadcasts": [{ "names": ["NBC Sports Chicago"] }]
            }]
        })
    }

    #[tokio::test]
    async fn test_scoreboard_decodes_games() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apis/site/v2/sports/basketball/nba/scoreboard"))
            .and(query_param("dates", "20250111"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "events": [
                    event("401", "STATUS_IN_PROGRESS", "in"),
                    event("402", "STATUS_SOMETHING_NEW", "pre")
                ]
            })))
            .mount(&server)
            .await;

        let date = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        let result = adapter(&server, Sport::Nba).get_games(date).await.unwrap();

        assert_eq!(result.count(), 2);
        assert_eq!(result.sources[0].provider, "ESPN NBA");
        assert!((result.aggregated_confidence - 0.9).abs() < f64::EPSILON);

        let live = &result.data[0];
        assert_eq!(live.status, GameStatus::Live);
        assert_eq!(live.home_team.abbreviation, "CHI");
        assert_eq!(live.home_score, 78);
        assert_eq!(live.away_score, 81);
        assert_eq!(live.period.as_deref(), Some("4:12 - 3rd Quarter"));
        assert_eq!(live.venue.as_deref(), Some("United Center"));
        assert_eq!(live.broadcast.as_deref(), Some("NBC Sports Chicago"));
        assert_eq!(live.start_time.to_rfc3339(), "2025-01-12T00:30:00+00:00");

        assert_eq!(result.data[1].status, GameStatus::Scheduled);
        assert_eq!(result.data[1].period, None);
    }

    #[tokio::test]
    async fn test_malformed_item_fails_whole_call() {
        let server = MockServer::start().await;
        let mut bad = event("403", "STATUS_FINAL", "post");
        bad["competitions"][0]["competitors"][0]["score"] = json!("eleven");
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "events": [event("401", "STATUS_FINAL", "post"), bad]
            })))
            .mount(&server)
            .await;

        let date = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        let err = adapter(&server, Sport::Nba).get_games(date).await.unwrap_err();
        match err {
            AppError::Upstream(e) => {
                assert_eq!(e.provider, "ESPN NBA");
                assert!(e.message.contains("eleven"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_errors_exhaust_into_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let err = adapter(&server, Sport::Nhl).get_teams().await.unwrap_err();
        match err {
            AppError::Upstream(e) => {
                assert_eq!(e.provider, "ESPN NHL");
                assert_eq!(e.status, Some(500));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_teams_and_nested_standings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apis/site/v2/sports/hockey/nhl/teams"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sports": [{ "leagues": [{ "teams": [
                    { "team": { "id": "4", "displayName": "Chicago Blackhawks", "abbreviation": "CHI",
                                "location": "Chicago", "logos": [{ "href": "https://logo/chi.png" }] } }
                ]}]}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/apis/v2/sports/hockey/nhl/standings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "National Hockey League",
                "children": [{
                    "name": "Central Division",
                    "standings": { "entries": [{
                        "team": { "id": "4", "displayName": "Chicago Blackhawks", "abbreviation": "CHI", "location": "Chicago" },
                        "stats": [
                            { "name": "wins", "value": 20.0 },
                            { "name": "losses", "value": 30.0 },
                            { "name": "gamesBehind", "value": 12.5 },
                            { "name": "streak", "value": -2.0, "displayValue": "L2" }
                        ]
                    }]}
                }]
            })))
            .mount(&server)
            .await;

        let adapter = adapter(&server, Sport::Nhl);
        let teams = adapter.get_teams().await.unwrap();
        assert_eq!(teams.data[0].logo_url.as_deref(), Some("https://logo/chi.png"));
        assert_eq!(teams.data[0].city, "Chicago");

        let standings = adapter.get_standings(None).await.unwrap();
        let row = &standings.data[0];
        assert_eq!((row.wins, row.losses), (20, 30));
        assert!((row.win_percentage - 0.4).abs() < 1e-9);
        assert_eq!(row.games_back, Some(12.5));
        assert_eq!(row.streak.as_deref(), Some("L2"));
        assert_eq!(row.team.division.as_deref(), Some("Central Division"));
    }
}
