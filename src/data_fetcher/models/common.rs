use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use super::sport::Sport;

/// A team as reported by one provider. Ids are provider-local.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
}

impl Team {
    /// Builds a team with only the required fields set
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            abbreviation: abbreviation.into(),
            city: city.into(),
            logo_url: None,
            conference: None,
            division: None,
        }
    }

    /// Case-insensitive substring match over name, city and abbreviation.
    /// `needle` must already be lowercase.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.city.to_lowercase().contains(needle)
            || self.abbreviation.to_lowercase().contains(needle)
    }
}

/// Canonical game state. Unknown provider vocabulary maps to `Scheduled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Scheduled,
    Live,
    Final,
    Postponed,
    Cancelled,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::Live => "live",
            GameStatus::Final => "final",
            GameStatus::Postponed => "postponed",
            GameStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub sport: Sport,
    pub start_time: DateTime<Utc>,
    pub status: GameStatus,
    pub home_team: Team,
    pub away_team: Team,
    #[serde(default)]
    pub home_score: u32,
    #[serde(default)]
    pub away_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<String>,
}

impl Game {
    pub fn is_live(&self) -> bool {
        self.status == GameStatus::Live
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub team: Team,
    pub wins: u32,
    pub losses: u32,
    pub win_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub games_back: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak: Option<String>,
}

impl Standing {
    /// Win percentage derived from the record, used when a provider omits it
    pub fn computed_win_percentage(wins: u32, losses: u32) -> f64 {
        let played = wins + losses;
        if played == 0 {
            0.0
        } else {
            f64::from(wins) / f64::from(played)
        }
    }
}

/// Attribution for data that came from one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub provider: String,
    pub fetched_at: DateTime<Utc>,
    pub confidence: f64,
}

impl DataSource {
    pub fn new(provider: impl Into<String>, confidence: f64) -> Self {
        Self {
            provider: provider.into(),
            fetched_at: Utc::now(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Result of one or more provider calls.
///
/// `data` and `errors` are independent: a response with some of each is a
/// normal partial success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResponse<T> {
    pub data: Vec<T>,
    pub sources: Vec<DataSource>,
    pub errors: Vec<String>,
    pub aggregated_confidence: f64,
}

impl<T> Default for AggregateResponse<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            sources: Vec::new(),
            errors: Vec::new(),
            aggregated_confidence: 0.0,
        }
    }
}

impl<T> AggregateResponse<T> {
    /// Single-source response as returned by one adapter
    pub fn single(data: Vec<T>, source: DataSource) -> Self {
        let aggregated_confidence = source.confidence;
        Self {
            data,
            sources: vec![source],
            errors: Vec::new(),
            aggregated_confidence,
        }
    }

    /// Folds another response into this one and recomputes the confidence
    pub fn merge(&mut self, other: AggregateResponse<T>) {
        self.data.extend(other.data);
        self.sources.extend(other.sources);
        self.errors.extend(other.errors);
        self.recompute_confidence();
    }

    /// Records a failed source. Its items are never included.
    pub fn push_error(&mut self, provider: &str, message: impl fmt::Display) {
        self.errors.push(format!("{provider}: {message}"));
    }

    /// Mean of the successful sources' confidences, 0 when none succeeded.
    /// Sources that returned zero items still count at full confidence.
    pub fn recompute_confidence(&mut self) {
        self.aggregated_confidence = if self.sources.is_empty() {
            0.0
        } else {
            self.sources.iter().map(|s| s.confidence).sum::<f64>() / self.sources.len() as f64
        };
    }

    /// Every contacted source failed
    pub fn is_total_failure(&self) -> bool {
        self.sources.is_empty() && !self.errors.is_empty()
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }

    /// Keeps only the items matching `predicate`, leaving source metadata intact
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool,
    {
        self.data.retain(|item| predicate(item));
        self
    }
}

impl<T: Clone + Eq + Hash> AggregateResponse<T> {
    /// Drops items identical to an earlier one, keeping first-seen order
    pub fn dedup(mut self) -> Self {
        let mut seen = HashSet::with_capacity(self.data.len());
        self.data.retain(|item| seen.insert(item.clone()));
        self
    }
}
