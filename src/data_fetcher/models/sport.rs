//! Sport tags and validation of caller-supplied parameters
//!
//! Everything here runs before any network call; failures surface as
//! [`AppError::Validation`] naming the offending field.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::validation::{MAX_QUERY_LENGTH, MAX_SEASON, MIN_SEASON};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Mlb,
    Nfl,
    Nba,
    Nhl,
    Ncaaf,
    Ncaab,
}

impl Sport {
    pub const ALL: [Sport; 6] = [
        Sport::Mlb,
        Sport::Nfl,
        Sport::Nba,
        Sport::Nhl,
        Sport::Ncaaf,
        Sport::Ncaab,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Mlb => "mlb",
            Sport::Nfl => "nfl",
            Sport::Nba => "nba",
            Sport::Nhl => "nhl",
            Sport::Ncaaf => "ncaaf",
            Sport::Ncaab => "ncaab",
        }
    }

    /// Short label used in provider names and error strings
    pub fn label(&self) -> &'static str {
        match self {
            Sport::Mlb => "MLB",
            Sport::Nfl => "NFL",
            Sport::Nba => "NBA",
            Sport::Nhl => "NHL",
            Sport::Ncaaf => "NCAAF",
            Sport::Ncaab => "NCAAB",
        }
    }

    /// True for sports whose seasons span a calendar year boundary
    pub fn season_spans_new_year(&self) -> bool {
        matches!(self, Sport::Nba | Sport::Nhl | Sport::Ncaab)
    }

    /// Season in progress (or most recently played) on `today`, labeled the
    /// way providers label it: by the ending year when it spans New Year.
    pub fn current_season(&self, today: NaiveDate) -> i32 {
        let year = today.year();
        match self {
            Sport::Mlb => year,
            Sport::Nfl | Sport::Ncaaf if today.month() < 3 => year - 1,
            Sport::Nfl | Sport::Ncaaf => year,
            _ if self.season_spans_new_year() && today.month() >= 10 => year + 1,
            _ => year,
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sport {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mlb" | "baseball" => Ok(Sport::Mlb),
            "nfl" => Ok(Sport::Nfl),
            "nba" => Ok(Sport::Nba),
            "nhl" => Ok(Sport::Nhl),
            "ncaaf" | "cfb" | "college-football" => Ok(Sport::Ncaaf),
            "ncaab" | "cbb" | "college-basketball" => Ok(Sport::Ncaab),
            other => Err(AppError::validation(
                "sport",
                format!(
                    "unsupported sport '{other}', expected one of: {}",
                    Sport::ALL.map(|s| s.as_str()).join(", ")
                ),
            )),
        }
    }
}

/// Parses a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        AppError::validation("date", format!("'{value}' is not a YYYY-MM-DD date ({e})"))
    })
}

/// Checks a season year against the supported range
pub fn validate_season(season: i32) -> Result<i32, AppError> {
    if (MIN_SEASON..=MAX_SEASON).contains(&season) {
        Ok(season)
    } else {
        Err(AppError::validation(
            "season",
            format!("{season} is outside {MIN_SEASON}..={MAX_SEASON}"),
        ))
    }
}

/// Normalizes a search query to its trimmed lowercase form
pub fn normalize_query(query: &str) -> Result<String, AppError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("query", "search query cannot be empty"));
    }
    if trimmed.chars().count() > MAX_QUERY_LENGTH {
        return Err(AppError::validation(
            "query",
            format!("search query longer than {MAX_QUERY_LENGTH} characters"),
        ));
    }
    Ok(trimmed.to_lowercase())
}
