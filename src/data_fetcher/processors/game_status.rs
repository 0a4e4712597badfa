use crate::data_fetcher::models::GameStatus;

/// Maps an ESPN status to the canonical status.
///
/// ESPN reports both a type name ("STATUS_IN_PROGRESS", "STATUS_FINAL", ...)
/// and a coarse state ("pre" | "in" | "post"). The name wins because only it
/// distinguishes postponed and cancelled games; the state is consulted for
/// names ESPN adds over time (e.g. "STATUS_END_PERIOD").
///
/// # Examples
///
/// ```rust
/// use sports_hub::data_fetcher::models::GameStatus;
/// use sports_hub::data_fetcher::processors::map_espn_status;
///
/// assert_eq!(map_espn_status("STATUS_FINAL", Some("post")), GameStatus::Final);
/// assert_eq!(map_espn_status("status.unknown.weird", None), GameStatus::Scheduled);
/// ```
pub fn map_espn_status(name: &str, state: Option<&str>) -> GameStatus {
    let status = match name.to_ascii_uppercase().as_str() {
        "STATUS_SCHEDULED" | "STATUS_TIME_TBD" => Some(GameStatus::Scheduled),
        "STATUS_IN_PROGRESS" | "STATUS_HALFTIME" | "STATUS_END_PERIOD" | "STATUS_DELAYED"
        | "STATUS_RAIN_DELAY" | "STATUS_OVERTIME" | "STATUS_FIRST_HALF"
        | "STATUS_SECOND_HALF" | "STATUS_SHOOTOUT" => Some(GameStatus::Live),
        "STATUS_FINAL" | "STATUS_FINAL_OT" | "STATUS_FULL_TIME" | "STATUS_FINAL_PEN"
        | "STATUS_END_OF_GAME" => Some(GameStatus::Final),
        "STATUS_POSTPONED" | "STATUS_SUSPENDED" => Some(GameStatus::Postponed),
        "STATUS_CANCELED" | "STATUS_CANCELLED" | "STATUS_FORFEIT" => Some(GameStatus::Cancelled),
        _ => None,
    };

    status.unwrap_or_else(|| match state {
        Some("in") => GameStatus::Live,
        Some("post") => GameStatus::Final,
        _ => {
            tracing::debug!("Unrecognized ESPN status '{}', defaulting to scheduled", name);
            GameStatus::Scheduled
        }
    })
}

/// Maps MLB Stats API game state. The detailed state carries postponements
/// and cancellations, the abstract state the coarse lifecycle.
pub fn map_mlb_status(abstract_state: &str, detailed_state: Option<&str>) -> GameStatus {
    if let Some(detailed) = detailed_state {
        let detailed = detailed.to_ascii_lowercase();
        if detailed.starts_with("postponed") || detailed.starts_with("suspended") {
            return GameStatus::Postponed;
        }
        if detailed.starts_with("cancelled") || detailed.starts_with("canceled") {
            return GameStatus::Cancelled;
        }
    }

    match abstract_state.to_ascii_lowercase().as_str() {
        "live" => GameStatus::Live,
        "final" => GameStatus::Final,
        "preview" => GameStatus::Scheduled,
        other => {
            tracing::debug!("Unrecognized MLB game state '{}', defaulting to scheduled", other);
            GameStatus::Scheduled
        }
    }
}

/// Maps SportsDataIO `Status` values
pub fn map_sportsdata_status(status: &str) -> GameStatus {
    match status.to_ascii_lowercase().as_str() {
        "scheduled" | "delayed" => GameStatus::Scheduled,
        "inprogress" | "in progress" => GameStatus::Live,
        "final" | "f/ot" | "f/so" | "closed" => GameStatus::Final,
        "postponed" | "suspended" => GameStatus::Postponed,
        "canceled" | "cancelled" | "forfeit" => GameStatus::Cancelled,
        other => {
            tracing::debug!(
                "Unrecognized SportsDataIO status '{}', defaulting to scheduled",
                other
            );
            GameStatus::Scheduled
        }
    }
}

/// Maps NCAA scoreboard `gameState` values
pub fn map_ncaa_status(game_state: &str) -> GameStatus {
    match game_state.to_ascii_lowercase().as_str() {
        "pre" => GameStatus::Scheduled,
        "live" => GameStatus::Live,
        "final" => GameStatus::Final,
        "postponed" => GameStatus::Postponed,
        "canceled" | "cancelled" => GameStatus::Cancelled,
        other => {
            tracing::debug!("Unrecognized NCAA game state '{}', defaulting to scheduled", other);
            GameStatus::Scheduled
        }
    }
}
