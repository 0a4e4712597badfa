//! ESPN public JSON wire types
//!
//! Scoreboard and teams come from the site v2 API, standings from the v2 API.
//! Fields that ESPN omits on some events are optional here and resolved during
//! decoding, never defaulted silently.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Scoreboard
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct EspnScoreboardResponse {
    #[serde(default)]
    pub events: Vec<EspnEvent>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnEvent {
    pub id: String,
    /// ISO 8601, sometimes without seconds ("2025-01-11T19:00Z")
    pub date: String,
    pub status: EspnStatus,
    #[serde(default)]
    pub competitions: Vec<EspnCompetition>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnStatus {
    pub period: Option<u32>,
    #[serde(rename = "displayClock")]
    pub display_clock: Option<String>,
    #[serde(rename = "type")]
    pub status_type: EspnStatusType,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnStatusType {
    /// "STATUS_SCHEDULED", "STATUS_IN_PROGRESS", "STATUS_FINAL", ...
    pub name: String,
    /// "pre" | "in" | "post"
    pub state: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnCompetition {
    #[serde(default)]
    pub competitors: Vec<EspnCompetitor>,
    pub venue: Option<EspnVenue>,
    #[serde(default)]
    pub broadcasts: Vec<EspnBroadcast>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnCompetitor {
    #[serde(rename = "homeAway")]
    pub home_away: String,
    /// ESPN sends scores as strings
    pub score: Option<String>,
    pub team: EspnTeam,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnVenue {
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnBroadcast {
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnTeam {
    pub id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub abbreviation: Option<String>,
    pub location: Option<String>,
    pub logo: Option<String>,
    #[serde(default)]
    pub logos: Vec<EspnLogo>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnLogo {
    pub href: String,
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct EspnTeamsResponse {
    #[serde(default)]
    pub sports: Vec<EspnSportEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnSportEntry {
    #[serde(default)]
    pub leagues: Vec<EspnLeagueEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnLeagueEntry {
    #[serde(default)]
    pub teams: Vec<EspnTeamWrapper>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnTeamWrapper {
    pub team: EspnTeam,
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

/// Standings are grouped by conference, sometimes nested further by division
#[derive(Debug, Deserialize, Clone)]
pub struct EspnStandingsGroup {
    pub name: Option<String>,
    #[serde(default)]
    pub children: Vec<EspnStandingsGroup>,
    pub standings: Option<EspnStandingsTable>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnStandingsTable {
    #[serde(default)]
    pub entries: Vec<EspnStandingsEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnStandingsEntry {
    pub team: EspnTeam,
    #[serde(default)]
    pub stats: Vec<EspnStat>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnStat {
    pub name: String,
    pub value: Option<f64>,
    #[serde(rename = "displayValue")]
    pub display_value: Option<String>,
}

impl EspnStandingsEntry {
    pub fn stat(&self, name: &str) -> Option<&EspnStat> {
        self.stats.iter().find(|s| s.name == name)
    }
}

impl EspnTeam {
    pub fn logo_url(&self) -> Option<String> {
        self.logo
            .clone()
            .or_else(|| self.logos.first().map(|l| l.href.clone()))
    }
}
