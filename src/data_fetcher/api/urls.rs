//! URL building utilities for provider endpoints
//!
//! Every builder takes the provider base URL without a trailing slash so
//! tests can point adapters at a mock server.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::data_fetcher::models::Sport;

/// ESPN path segment for a league, e.g. `basketball/nba`
pub fn espn_league_path(sport: Sport) -> &'static str {
    match sport {
        Sport::Mlb => "baseball/mlb",
        Sport::Nfl => "football/nfl",
        Sport::Nba => "basketball/nba",
        Sport::Nhl => "hockey/nhl",
        Sport::Ncaaf => "football/college-football",
        Sport::Ncaab => "basketball/mens-college-basketball",
    }
}

/// Builds the ESPN scoreboard URL for one day.
///
/// College scoreboards are filtered to Division I (`groups=80` FBS,
/// `groups=50` D1 basketball) with a raised limit, otherwise ESPN returns
/// only featured games.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use sports_hub::data_fetcher::api::build_espn_scoreboard_url;
/// use sports_hub::data_fetcher::models::Sport;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
/// let url = build_espn_scoreboard_url("https://site.api.espn.com", Sport::Nba, date);
/// assert_eq!(
///     url,
///     "https://site.api.espn.com/apis/site/v2/sports/basketball/nba/scoreboard?dates=20250111"
/// );
/// ```
pub fn build_espn_scoreboard_url(base_url: &str, sport: Sport, date: NaiveDate) -> String {
    let path = espn_league_path(sport);
    let dates = date.format("%Y%m%d");
    match sport {
        Sport::Ncaaf => {
            format!("{base_url}/apis/site/v2/sports/{path}/scoreboard?dates={dates}&groups=80&limit=300")
        }
        Sport::Ncaab => {
            format!("{base_url}/apis/site/v2/sports/{path}/scoreboard?dates={dates}&groups=50&limit=400")
        }
        _ => format!("{base_url}/apis/site/v2/sports/{path}/scoreboard?dates={dates}"),
    }
}

pub fn build_espn_teams_url(base_url: &str, sport: Sport) -> String {
    format!(
        "{base_url}/apis/site/v2/sports/{}/teams?limit=1000",
        espn_league_path(sport)
    )
}

/// Standings live under `/apis/v2`, not the `site` API
pub fn build_espn_standings_url(base_url: &str, sport: Sport, season: Option<i32>) -> String {
    let path = espn_league_path(sport);
    match season {
        Some(season) => format!("{base_url}/apis/v2/sports/{path}/standings?season={season}"),
        None => format!("{base_url}/apis/v2/sports/{path}/standings"),
    }
}

/// Builds the MLB Stats API schedule URL for one day with teams and linescore hydrated.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use sports_hub::data_fetcher::api::build_mlb_schedule_url;
///
/// let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
/// let url = build_mlb_schedule_url("https://statsapi.mlb.com", date);
/// assert_eq!(
///     url,
///     "https://statsapi.mlb.com/api/v1/schedule?sportId=1&startDate=2024-04-01&endDate=2024-04-01&hydrate=team,linescore,broadcasts"
/// );
/// ```
pub fn build_mlb_schedule_url(base_url: &str, date: NaiveDate) -> String {
    let day = date.format("%Y-%m-%d");
    format!(
        "{base_url}/api/v1/schedule?sportId=1&startDate={day}&endDate={day}&hydrate=team,linescore,broadcasts"
    )
}

pub fn build_mlb_teams_url(base_url: &str, season: i32) -> String {
    format!("{base_url}/api/v1/teams?sportId=1&season={season}")
}

/// American (103) and National (104) league regular-season standings
pub fn build_mlb_standings_url(base_url: &str, season: i32) -> String {
    format!(
        "{base_url}/api/v1/standings?leagueId=103,104&season={season}&standingsTypes=regularSeason&hydrate=team"
    )
}

/// SportsDataIO league code
pub fn sportsdata_league(sport: Sport) -> &'static str {
    match sport {
        Sport::Mlb => "mlb",
        Sport::Nfl => "nfl",
        Sport::Nba => "nba",
        Sport::Nhl => "nhl",
        Sport::Ncaaf => "cfb",
        Sport::Ncaab => "cbb",
    }
}

/// Builds the SportsDataIO games-by-date URL. Dates use the provider's
/// `2025-JAN-11` form; NFL exposes the same rows as `ScoresByDate`.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use sports_hub::data_fetcher::api::build_sportsdata_games_url;
/// use sports_hub::data_fetcher::models::Sport;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
/// let url = build_sportsdata_games_url("https://api.sportsdata.io", Sport::Nhl, date);
/// assert_eq!(url, "https://api.sportsdata.io/v3/nhl/scores/json/GamesByDate/2025-JAN-11");
/// ```
pub fn build_sportsdata_games_url(base_url: &str, sport: Sport, date: NaiveDate) -> String {
    let endpoint = if sport == Sport::Nfl {
        "ScoresByDate"
    } else {
        "GamesByDate"
    };
    let day = date.format("%Y-%b-%d").to_string().to_uppercase();
    format!(
        "{base_url}/v3/{}/scores/json/{endpoint}/{day}",
        sportsdata_league(sport)
    )
}

pub fn build_sportsdata_teams_url(base_url: &str, sport: Sport) -> String {
    format!("{base_url}/v3/{}/scores/json/teams", sportsdata_league(sport))
}

pub fn build_sportsdata_standings_url(base_url: &str, sport: Sport, season: i32) -> String {
    format!(
        "{base_url}/v3/{}/scores/json/Standings/{season}",
        sportsdata_league(sport)
    )
}

/// NCAA API sport/division path; only the college sports have one
pub fn ncaa_sport_path(sport: Sport) -> Option<&'static str> {
    match sport {
        Sport::Ncaaf => Some("football/fbs"),
        Sport::Ncaab => Some("basketball-men/d1"),
        _ => None,
    }
}

/// Last FBS regular-season week; later weeks and January dates are bowl season
const NCAA_FOOTBALL_LAST_WEEK: i64 = 16;

/// Season and scoreboard week of the FBS slate covering `date`.
///
/// Week 1 runs from the Tuesday before Labor Day through Labor Day. Dates
/// before that fold into week 1; bowl season is the week `"P"`.
pub fn ncaa_football_week(date: NaiveDate) -> (i32, String) {
    let season = if date.month() >= 8 { date.year() } else { date.year() - 1 };
    if season != date.year() {
        return (season, "P".to_string());
    }
    let Some(labor_day) = NaiveDate::from_weekday_of_month_opt(season, 9, Weekday::Mon, 1) else {
        return (season, "P".to_string());
    };
    let days = (date - (labor_day - Duration::days(6))).num_days();
    let week = days.max(0) / 7 + 1;
    if week > NCAA_FOOTBALL_LAST_WEEK {
        (season, "P".to_string())
    } else {
        (season, format!("{week:02}"))
    }
}

/// Builds the NCAA scoreboard URL for the slate containing `date`.
///
/// Basketball is published per day, football per season week.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use sports_hub::data_fetcher::api::build_ncaa_scoreboard_url;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
/// let url = build_ncaa_scoreboard_url("https://ncaa-api.henrygd.me", "basketball-men/d1", date);
/// assert_eq!(url, "https://ncaa-api.henrygd.me/scoreboard/basketball-men/d1/2025/01/11/all-conf");
///
/// let date = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
/// let url = build_ncaa_scoreboard_url("https://ncaa-api.henrygd.me", "football/fbs", date);
/// assert_eq!(url, "https://ncaa-api.henrygd.me/scoreboard/football/fbs/2024/14/all-conf");
/// ```
pub fn build_ncaa_scoreboard_url(base_url: &str, sport_path: &str, date: NaiveDate) -> String {
    let slate = if sport_path.starts_with("football") {
        let (season, week) = ncaa_football_week(date);
        format!("{season}/{week}")
    } else {
        date.format("%Y/%m/%d").to_string()
    };
    format!("{base_url}/scoreboard/{sport_path}/{slate}/all-conf")
}

pub fn build_ncaa_schools_url(base_url: &str) -> String {
    format!("{base_url}/schools-index")
}

pub fn build_ncaa_standings_url(base_url: &str, sport_path: &str) -> String {
    format!("{base_url}/standings/{sport_path}")
}
