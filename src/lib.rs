//! Multi-league sports data library
//!
//! Fetches games, standings and teams from several upstream providers
//! concurrently, normalizes them into one data model and merges whatever
//! succeeds into an [`AggregateResponse`] that records its sources, the
//! errors of the providers that failed, and an aggregated confidence.
//! Results are cached with a TTL chosen from the data's volatility.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sports_hub::config::Config;
//! use sports_hub::data_fetcher::api::CachedOrchestrator;
//! use sports_hub::response::ApiResponse;
//! use sports_hub::error::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let orchestrator = CachedOrchestrator::from_config(&config)?;
//!
//!     // Partial failures still return data; failed providers show up in `errors`
//!     let games = orchestrator.get_all_games(None, false).await;
//!     for error in &games.value.errors {
//!         eprintln!("{error}");
//!     }
//!
//!     let reply = ApiResponse::from_cached(games, false);
//!     println!("{} {}", reply.status, reply.cache_control);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod response;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::api::{CachedOrchestrator, LeagueAdapter, LeagueOrchestrator};
pub use data_fetcher::cache::{CacheStats, SportsCache};
pub use data_fetcher::models::{AggregateResponse, DataSource, Game, GameStatus, Sport, Standing, Team};
pub use error::AppError;
pub use response::ApiResponse;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
