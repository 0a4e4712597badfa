/// Wire types for the NCAA scoreboard API (ncaa-api.henrygd.me).
/// Scores, epochs and records all arrive as strings.
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct NcaaScoreboardResponse {
    #[serde(default)]
    pub games: Vec<NcaaGameWrapper>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NcaaGameWrapper {
    pub game: NcaaGame,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NcaaGame {
    #[serde(rename = "gameID")]
    pub game_id: String,
    /// "pre" | "live" | "final", occasionally "postponed" / "canceled"
    pub game_state: String,
    pub start_time_epoch: Option<String>,
    pub current_period: Option<String>,
    pub network: Option<String>,
    pub home: NcaaGameTeam,
    pub away: NcaaGameTeam,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NcaaGameTeam {
    #[serde(default)]
    pub score: String,
    pub names: NcaaNames,
    #[serde(default)]
    pub conferences: Vec<NcaaConference>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NcaaNames {
    pub char6: Option<String>,
    pub short: String,
    pub seo: String,
    pub full: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NcaaConference {
    pub conference_name: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NcaaSchool {
    pub slug: String,
    pub name: String,
    pub long: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NcaaStandingsResponse {
    #[serde(default)]
    pub data: Vec<NcaaConferenceStandings>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NcaaConferenceStandings {
    pub conference: String,
    #[serde(default)]
    pub standings: Vec<NcaaStandingRow>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NcaaStandingRow {
    #[serde(rename = "School")]
    pub school: String,
    #[serde(rename = "Overall W")]
    pub overall_wins: String,
    #[serde(rename = "Overall L")]
    pub overall_losses: String,
    #[serde(rename = "Overall PCT")]
    pub overall_pct: Option<String>,
    #[serde(rename = "Streak")]
    pub streak: Option<String>,
}
