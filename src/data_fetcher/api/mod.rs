pub mod adapters;
pub mod cached_orchestrator;
pub mod fetch_utils;
pub mod http_client;
pub mod orchestrator;
pub mod urls;

// Re-export URL utilities
pub use urls::*;
// Re-export HTTP client utilities
pub use http_client::create_http_client_with_timeout;
pub use fetch_utils::RetryPolicy;

pub use adapters::{
    AdapterSettings, EspnAdapter, LeagueAdapter, MlbStatsAdapter, NcaaAdapter, SportsDataIoAdapter,
};
pub use cached_orchestrator::CachedOrchestrator;
pub use orchestrator::LeagueOrchestrator;
