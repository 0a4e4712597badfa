use chrono::NaiveDate;
use serde_json::json;
use sports_hub::data_fetcher::api::{
    AdapterSettings, EspnAdapter, LeagueAdapter, LeagueOrchestrator, MlbStatsAdapter,
    RetryPolicy, create_http_client_with_timeout,
};
use sports_hub::data_fetcher::models::{GameStatus, Sport};
use sports_hub::testing_utils::{
    FailingAdapter, HangingAdapter, StaticAdapter, game_with_status, standing, team,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn jan_11() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 11).unwrap()
}

fn settings(server: &MockServer, confidence: f64) -> AdapterSettings {
    let client = create_http_client_with_timeout(5).unwrap();
    AdapterSettings::new(client, server.uri(), confidence)
        .with_retry(RetryPolicy::new(1, Duration::from_millis(1)))
}

fn mlb_game(pk: u64, state: &str) -> serde_json::Value {
    let side = |id: u64, name: &str, abbr: &str, score: u32| {
        json!({ "score": score, "team": { "id": id, "name": name, "abbreviation": abbr } })
    };
    json!({
        "gamePk": pk,
        "gameDate": "2025-01-11T19:05:00Z",
        "status": { "abstractGameState": state, "detailedState": state },
        "teams": {
            "home": side(112, "Chicago Cubs", "CHC", 4),
            "away": side(158, "Milwaukee Brewers", "MIL", 2)
        }
    })
}

/// MLB returns three games while the NBA source never answers: the result
/// keeps MLB's games, names the NBA timeout, and the confidence is MLB's alone
#[tokio::test]
async fn test_timeout_of_one_league_keeps_other_leagues_games() {
    let mlb = StaticAdapter::new("MLB", Sport::Mlb, 1.0).with_games(vec![
        game_with_status("1", Sport::Mlb, GameStatus::Final),
        game_with_status("2", Sport::Mlb, GameStatus::Live),
        game_with_status("3", Sport::Mlb, GameStatus::Scheduled),
    ]);
    let orchestrator = LeagueOrchestrator::new(vec![
        Arc::new(mlb),
        Arc::new(HangingAdapter::new("NBA", Sport::Nba)),
    ])
    .with_adapter_timeout(Duration::from_millis(100));

    let result = orchestrator.get_all_games(Some(jan_11())).await;

    assert_eq!(result.count(), 3);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("NBA: "));
    assert!(result.errors[0].contains("timeout"));
    assert_eq!(result.aggregated_confidence, 1.0);
}

#[tokio::test]
async fn test_timeout_scenario_over_http() {
    let mlb_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/schedule"))
        .and(query_param("startDate", "2025-01-11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dates": [{ "date": "2025-01-11", "games": [
                mlb_game(1, "Final"), mlb_game(2, "Final"), mlb_game(3, "Preview")
            ]}]
        })))
        .mount(&mlb_server)
        .await;

    let nba_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "events": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&nba_server)
        .await;

    let adapters: Vec<Arc<dyn LeagueAdapter>> = vec![
        Arc::new(MlbStatsAdapter::new(settings(&mlb_server, 1.0))),
        Arc::new(EspnAdapter::new(Sport::Nba, settings(&nba_server, 0.9))),
    ];
    let orchestrator =
        LeagueOrchestrator::new(adapters).with_adapter_timeout(Duration::from_millis(500));

    let result = orchestrator.get_all_games(Some(jan_11())).await;

    assert_eq!(result.count(), 3);
    assert!(result.data.iter().all(|g| g.sport == Sport::Mlb));
    assert_eq!(result.sources.len(), 1);
    assert_eq!(result.sources[0].provider, "MLB Stats");
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("ESPN NBA: "));
    assert!(result.errors[0].contains("timeout"));
    assert_eq!(result.aggregated_confidence, 1.0);
}

#[tokio::test]
async fn test_partial_failure_mean_confidence() {
    let orchestrator = LeagueOrchestrator::new(vec![
        Arc::new(
            StaticAdapter::new("MLB Stats", Sport::Mlb, 1.0)
                .with_teams(vec![team("112", "Chicago Cubs", "CHC", "Chicago")]),
        ),
        Arc::new(
            StaticAdapter::new("ESPN NBA", Sport::Nba, 0.8)
                .with_teams(vec![team("4", "Chicago Bulls", "CHI", "Chicago")]),
        ),
        Arc::new(FailingAdapter::new(
            "ESPN NHL",
            Sport::Nhl,
            Some(500),
            "Internal Server Error",
        )),
    ]);

    let result = orchestrator.get_all_teams().await;

    assert_eq!(result.count(), 2);
    assert_eq!(result.sources.len(), 2);
    assert!((result.aggregated_confidence - 0.9).abs() < 1e-9);
    assert_eq!(
        result.errors,
        vec!["ESPN NHL: Internal Server Error (HTTP 500)".to_string()]
    );
    // Items keep adapter order
    assert_eq!(result.data[0].abbreviation, "CHC");
    assert_eq!(result.data[1].abbreviation, "CHI");
}

#[tokio::test]
async fn test_total_failure_is_empty_with_zero_confidence() {
    let orchestrator = LeagueOrchestrator::new(vec![
        Arc::new(FailingAdapter::new("MLB Stats", Sport::Mlb, Some(503), "Service Unavailable")),
        Arc::new(FailingAdapter::new("ESPN NFL", Sport::Nfl, None, "connection refused")),
    ]);

    let result = orchestrator.get_all_standings(None).await.unwrap();

    assert!(result.data.is_empty());
    assert!(result.sources.is_empty());
    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.aggregated_confidence, 0.0);
    assert!(result.is_total_failure());
}

#[tokio::test]
async fn test_live_games_across_leagues() {
    let orchestrator = LeagueOrchestrator::new(vec![
        Arc::new(StaticAdapter::new("MLB Stats", Sport::Mlb, 1.0).with_games(vec![
            game_with_status("m1", Sport::Mlb, GameStatus::Live),
            game_with_status("m2", Sport::Mlb, GameStatus::Final),
        ])),
        Arc::new(StaticAdapter::new("ESPN NHL", Sport::Nhl, 0.9).with_games(vec![
            game_with_status("h1", Sport::Nhl, GameStatus::Live),
        ])),
    ]);

    let live = orchestrator.get_live_games().await;
    let ids: Vec<&str> = live.data.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, vec!["m1", "h1"]);
    assert!((live.aggregated_confidence - 0.95).abs() < 1e-9);
}

#[tokio::test]
async fn test_search_and_standings_across_leagues() {
    let cubs = team("112", "Chicago Cubs", "CHC", "Chicago");
    let orchestrator = LeagueOrchestrator::new(vec![
        Arc::new(
            StaticAdapter::new("MLB Stats", Sport::Mlb, 1.0)
                .with_teams(vec![cubs.clone(), team("147", "New York Yankees", "NYY", "Bronx")])
                .with_standings(vec![standing(cubs, 83, 79)]),
        ),
        Arc::new(
            StaticAdapter::new("ESPN NFL", Sport::Nfl, 0.9)
                .with_teams(vec![team("3", "Chicago Bears", "CHI", "Chicago")]),
        ),
    ]);

    let found = orchestrator.search("chi").await.unwrap();
    let names: Vec<&str> = found.data.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Chicago Cubs", "Chicago Bears"]);

    let by_abbreviation = orchestrator.search("NYY").await.unwrap();
    assert_eq!(by_abbreviation.count(), 1);

    let standings = orchestrator.get_all_standings(Some(2024)).await.unwrap();
    assert_eq!(standings.count(), 1);
    assert_eq!(standings.sources.len(), 2);
}
