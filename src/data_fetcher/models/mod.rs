pub mod common;
pub mod espn;
pub mod mlb;
pub mod ncaa;
pub mod sport;
pub mod sportsdata;

// Re-export the canonical types; wire types stay behind their module paths
pub use common::{AggregateResponse, DataSource, Game, GameStatus, Standing, Team};
pub use sport::{Sport, normalize_query, parse_date, validate_season};
