//! SportsDataIO (api.sportsdata.io/v3) wire types
//!
//! The same shapes serve MLB, NBA, NFL and NHL; sport-specific field names
//! (runs vs. score, inning vs. quarter vs. period) are folded with aliases.

use serde::Deserialize;

/// Field SportsDataIO sends either as a number or as a string ("OT", "F")
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum TextOrNumber {
    Number(i64),
    Text(String),
}

impl SdGame {
    pub fn id(&self) -> Option<String> {
        self.game_id
            .as_ref()
            .or(self.score_id.as_ref())
            .map(TextOrNumber::to_display)
    }

    pub fn home_points(&self) -> u32 {
        self.home_team_score.or(self.home_team_runs).unwrap_or(0)
    }

    pub fn away_points(&self) -> u32 {
        self.away_team_score.or(self.away_team_runs).unwrap_or(0)
    }
}

impl TextOrNumber {
    pub fn to_display(&self) -> String {
        match self {
            TextOrNumber::Number(n) => n.to_string(),
            TextOrNumber::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SdGame {
    #[serde(rename = "GameID")]
    pub game_id: Option<TextOrNumber>,
    /// NFL score rows identify games by ScoreID
    #[serde(rename = "ScoreID")]
    pub score_id: Option<TextOrNumber>,
    pub status: Option<String>,
    #[serde(rename = "DateTimeUTC")]
    pub date_time_utc: Option<String>,
    /// Game day when no start time is announced yet
    pub day: Option<String>,
    pub home_team: String,
    pub away_team: String,
    #[serde(rename = "HomeTeamID")]
    pub home_team_id: Option<i64>,
    #[serde(rename = "AwayTeamID")]
    pub away_team_id: Option<i64>,
    pub home_team_score: Option<u32>,
    pub away_team_score: Option<u32>,
    /// MLB reports runs instead of scores
    pub home_team_runs: Option<u32>,
    pub away_team_runs: Option<u32>,
    #[serde(alias = "Period", alias = "Inning")]
    pub quarter: Option<TextOrNumber>,
    pub stadium_name: Option<String>,
    pub channel: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SdTeam {
    #[serde(rename = "TeamID")]
    pub team_id: i64,
    pub key: String,
    pub city: Option<String>,
    pub name: String,
    pub conference: Option<String>,
    pub division: Option<String>,
    pub wikipedia_logo_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SdStanding {
    #[serde(rename = "TeamID")]
    pub team_id: i64,
    pub key: String,
    pub city: Option<String>,
    pub name: String,
    pub conference: Option<String>,
    pub division: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub percentage: Option<f64>,
    #[serde(alias = "GamesBack")]
    pub games_behind: Option<f64>,
    pub streak_description: Option<String>,
}
