//! Application-wide constants and configuration defaults
//!
//! Centralizes timeouts, TTLs, retry bounds and environment variable names so
//! the cache policy and adapters agree on the same numbers.

/// Default timeout for a single upstream HTTP request in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 15;

/// Default deadline for one adapter call inside an orchestrated fan-out,
/// covering all retries of that call
pub const DEFAULT_ADAPTER_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 32;

/// User agent sent to every upstream provider
pub const USER_AGENT: &str = concat!("sports_hub/", env!("CARGO_PKG_VERSION"));

/// Default namespace prefixed to every cache key
pub const DEFAULT_CACHE_NAMESPACE: &str = "sports";

/// Default capacity of the in-process cache layer
pub const DEFAULT_MEMORY_CACHE_CAPACITY: usize = 512;

/// Cache TTL (Time To Live) values in seconds
pub mod cache_ttl {
    /// Game lists containing at least one live game
    pub const LIVE_GAMES_SECONDS: u64 = 30;

    /// Game lists with no live game (scheduled, final, postponed)
    pub const GAMES_SECONDS: u64 = 300;

    /// League standings
    pub const STANDINGS_SECONDS: u64 = 300;

    /// Team rosters
    pub const TEAMS_SECONDS: u64 = 3600;

    /// Team search results
    pub const SEARCH_SECONDS: u64 = 3600;
}

/// Retry policy for upstream calls
pub mod retry {
    /// Maximum number of retries after the first attempt
    pub const MAX_RETRIES: u32 = 3;

    /// Initial backoff delay, doubled after each retry
    pub const BASE_DELAY_MS: u64 = 250;

    /// Upper bound for a single backoff sleep, including Retry-After values
    pub const MAX_DELAY_SECONDS: u64 = 10;

    /// Fraction of the current backoff added as random jitter
    pub const JITTER_FRACTION: f64 = 0.2;
}

/// Default provider-reported confidence per upstream
pub mod confidence {
    pub const MLB_STATS: f64 = 1.0;
    pub const SPORTSDATA: f64 = 0.95;
    pub const ESPN: f64 = 0.9;
    pub const NCAA: f64 = 0.85;
}

/// Default upstream base URLs
pub mod providers {
    pub const ESPN_BASE_URL: &str = "https://site.api.espn.com";
    pub const MLB_STATS_BASE_URL: &str = "https://statsapi.mlb.com";
    pub const SPORTSDATA_BASE_URL: &str = "https://api.sportsdata.io";
    pub const NCAA_BASE_URL: &str = "https://ncaa-api.henrygd.me";

    /// Header carrying the SportsDataIO subscription key
    pub const SPORTSDATA_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
}

/// Environment variable names
pub mod env_vars {
    /// Override log file path
    pub const LOG_FILE: &str = "SPORTS_HUB_LOG_FILE";

    /// Override HTTP request timeout in seconds
    pub const HTTP_TIMEOUT: &str = "SPORTS_HUB_HTTP_TIMEOUT";

    /// Override per-adapter deadline in seconds
    pub const ADAPTER_TIMEOUT: &str = "SPORTS_HUB_ADAPTER_TIMEOUT";

    /// Override durable cache directory
    pub const CACHE_DIR: &str = "SPORTS_HUB_CACHE_DIR";

    /// SportsDataIO subscription key
    pub const SPORTSDATA_API_KEY: &str = "SPORTSDATA_API_KEY";
}

/// Bounds used when validating caller-supplied parameters
pub mod validation {
    /// First season any supported league has records for
    pub const MIN_SEASON: i32 = 1871;

    /// Last season accepted as input
    pub const MAX_SEASON: i32 = 2100;

    /// Longest accepted search query
    pub const MAX_QUERY_LENGTH: usize = 100;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_ttl_shorter_than_idle_ttl() {
        assert!(cache_ttl::LIVE_GAMES_SECONDS < cache_ttl::GAMES_SECONDS);
        assert!(cache_ttl::STANDINGS_SECONDS <= cache_ttl::TEAMS_SECONDS);
        assert_eq!(cache_ttl::SEARCH_SECONDS, cache_ttl::TEAMS_SECONDS);
    }

    #[test]
    fn test_adapter_deadline_covers_http_timeout() {
        assert!(DEFAULT_ADAPTER_TIMEOUT_SECONDS >= DEFAULT_HTTP_TIMEOUT_SECONDS);
    }

    #[test]
    fn test_retry_constants_are_reasonable() {
        let max_retries = retry::MAX_RETRIES;
        let base_delay = retry::BASE_DELAY_MS;
        assert!(max_retries > 0 && max_retries <= 5);
        assert!(base_delay > 0 && base_delay < retry::MAX_DELAY_SECONDS * 1000);
        assert!(retry::JITTER_FRACTION >= 0.0 && retry::JITTER_FRACTION < 1.0);
    }

    #[test]
    fn test_default_confidences_in_range() {
        for c in [
            confidence::MLB_STATS,
            confidence::SPORTSDATA,
            confidence::ESPN,
            confidence::NCAA,
        ] {
            assert!((0.0..=1.0).contains(&c));
        }
    }
}
