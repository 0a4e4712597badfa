pub mod api;
pub mod cache;
pub mod models;
pub mod processors;

pub use api::{CachedOrchestrator, LeagueAdapter, LeagueOrchestrator};
pub use models::{AggregateResponse, Game, GameStatus, Sport, Standing, Team};
