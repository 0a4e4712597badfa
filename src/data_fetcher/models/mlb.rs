//! MLB Stats API (statsapi.mlb.com/api/v1) wire types

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct MlbScheduleResponse {
    #[serde(default)]
    pub dates: Vec<MlbScheduleDate>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MlbScheduleDate {
    pub date: String,
    #[serde(default)]
    pub games: Vec<MlbGame>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MlbGame {
    pub game_pk: u64,
    pub game_date: String,
    pub status: MlbGameStatus,
    pub teams: MlbGameTeams,
    pub venue: Option<MlbNamed>,
    pub linescore: Option<MlbLinescore>,
    #[serde(default)]
    pub broadcasts: Vec<MlbNamed>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MlbGameStatus {
    /// "Preview" | "Live" | "Final"
    pub abstract_game_state: String,
    /// "Scheduled", "In Progress", "Final", "Postponed", "Cancelled", ...
    pub detailed_state: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MlbGameTeams {
    pub home: MlbGameTeam,
    pub away: MlbGameTeam,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MlbGameTeam {
    pub score: Option<u32>,
    pub team: MlbTeam,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MlbLinescore {
    pub current_inning_ordinal: Option<String>,
    pub inning_half: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MlbNamed {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MlbTeam {
    pub id: u64,
    pub name: String,
    pub abbreviation: Option<String>,
    pub location_name: Option<String>,
    pub team_name: Option<String>,
    pub league: Option<MlbNamed>,
    pub division: Option<MlbNamed>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MlbTeamsResponse {
    #[serde(default)]
    pub teams: Vec<MlbTeam>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MlbStandingsResponse {
    #[serde(default)]
    pub records: Vec<MlbStandingsRecord>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MlbStandingsRecord {
    pub division: Option<MlbNamed>,
    #[serde(default)]
    pub team_records: Vec<MlbTeamRecord>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MlbTeamRecord {
    pub team: MlbTeam,
    pub wins: u32,
    pub losses: u32,
    /// ".600"
    pub winning_percentage: Option<String>,
    /// "-" for the division leader, otherwise "2.5"
    pub games_back: Option<String>,
    pub streak: Option<MlbStreak>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MlbStreak {
    pub streak_code: Option<String>,
}
