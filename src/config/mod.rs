use crate::constants::{
    DEFAULT_ADAPTER_TIMEOUT_SECONDS, DEFAULT_CACHE_NAMESPACE, DEFAULT_HTTP_TIMEOUT_SECONDS,
    DEFAULT_MEMORY_CACHE_CAPACITY, confidence, env_vars, providers, retry,
};
use crate::data_fetcher::models::Sport;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_cache_dir_path, get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// Timeout for a single upstream HTTP request
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Deadline for one adapter call inside a fan-out, retries included
    #[serde(default = "default_adapter_timeout")]
    pub adapter_timeout_seconds: u64,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: retry::MAX_RETRIES,
            base_delay_ms: retry::BASE_DELAY_MS,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CacheConfig {
    /// Prefix of every cache key
    pub namespace: String,
    /// Entries held by the in-process layer
    pub memory_capacity: usize,
    /// Also persist entries to disk
    pub durable: bool,
    /// Directory of the durable store, defaults to the platform cache dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_CACHE_NAMESPACE.to_string(),
            memory_capacity: DEFAULT_MEMORY_CACHE_CAPACITY,
            durable: false,
            directory: None,
        }
    }
}

/// One upstream provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub enabled: bool,
    pub base_url: String,
    /// Confidence reported with every successful response from this provider
    pub confidence: f64,
    /// Leagues to build an adapter for. Ignored by single-league providers.
    #[serde(default)]
    pub leagues: Vec<Sport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default = "default_espn")]
    pub espn: ProviderConfig,
    #[serde(default = "default_mlb_stats")]
    pub mlb_stats: ProviderConfig,
    #[serde(default = "default_sportsdata")]
    pub sportsdata: ProviderConfig,
    #[serde(default = "default_ncaa")]
    pub ncaa: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            espn: default_espn(),
            mlb_stats: default_mlb_stats(),
            sportsdata: default_sportsdata(),
            ncaa: default_ncaa(),
        }
    }
}

fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_adapter_timeout() -> u64 {
    DEFAULT_ADAPTER_TIMEOUT_SECONDS
}

// MLB comes from the official Stats API, so ESPN covers the other leagues
fn default_espn() -> ProviderConfig {
    ProviderConfig {
        enabled: true,
        base_url: providers::ESPN_BASE_URL.to_string(),
        confidence: confidence::ESPN,
        leagues: vec![Sport::Nfl, Sport::Nba, Sport::Nhl, Sport::Ncaaf, Sport::Ncaab],
        api_key: None,
    }
}

fn default_mlb_stats() -> ProviderConfig {
    ProviderConfig {
        enabled: true,
        base_url: providers::MLB_STATS_BASE_URL.to_string(),
        confidence: confidence::MLB_STATS,
        leagues: vec![Sport::Mlb],
        api_key: None,
    }
}

fn default_sportsdata() -> ProviderConfig {
    ProviderConfig {
        enabled: false,
        base_url: providers::SPORTSDATA_BASE_URL.to_string(),
        confidence: confidence::SPORTSDATA,
        leagues: vec![Sport::Nfl, Sport::Nba, Sport::Nhl],
        api_key: None,
    }
}

fn default_ncaa() -> ProviderConfig {
    ProviderConfig {
        enabled: false,
        base_url: providers::NCAA_BASE_URL.to_string(),
        confidence: confidence::NCAA,
        leagues: vec![Sport::Ncaaf, Sport::Ncaab],
        api_key: None,
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            adapter_timeout_seconds: default_adapter_timeout(),
            retry: RetryConfig::default(),
            cache: CacheConfig::default(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// A missing file yields the defaults. Environment variables can
    /// override config file values.
    ///
    /// # Environment Variables
    /// - `SPORTS_HUB_LOG_FILE` - Override log file path
    /// - `SPORTS_HUB_HTTP_TIMEOUT` - Override HTTP timeout in seconds (default: 15)
    /// - `SPORTS_HUB_ADAPTER_TIMEOUT` - Override per-adapter deadline in seconds (default: 30)
    /// - `SPORTS_HUB_CACHE_DIR` - Enable the durable cache in this directory
    /// - `SPORTSDATA_API_KEY` - SportsDataIO key; enables that provider
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(AppError)` - The file could not be read or parsed, or validation failed
    pub async fn load() -> Result<Self, AppError> {
        let mut config = Self::load_file_or_default(&get_config_path()).await?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies the environment variable overrides listed on [`Config::load`]
    pub fn apply_env_overrides(&mut self) {
        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }

        if let Some(timeout) = std::env::var(env_vars::ADAPTER_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.adapter_timeout_seconds = timeout;
        }

        if let Ok(dir) = std::env::var(env_vars::CACHE_DIR) {
            self.cache.durable = true;
            self.cache.directory = Some(dir);
        }

        if let Ok(key) = std::env::var(env_vars::SPORTSDATA_API_KEY)
            && !key.trim().is_empty()
        {
            self.providers.sportsdata.api_key = Some(key);
            self.providers.sportsdata.enabled = true;
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    pub fn get_cache_dir_path() -> String {
        paths::get_cache_dir_path()
    }

    /// Displays current configuration settings to stdout.
    ///
    /// API keys are masked. Works without a config file by showing defaults.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();
        let config = Config::load().await?;

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        if Path::new(&config_path).exists() {
            println!("{config_path}");
        } else {
            println!("{config_path}");
            println!("(Not found, showing defaults)");
        }
        println!("────────────────────────────────────");
        println!("Timeouts:");
        println!("HTTP request: {} seconds", config.http_timeout_seconds);
        println!("Adapter deadline: {} seconds", config.adapter_timeout_seconds);
        println!(
            "Retries: {} (base delay {} ms)",
            config.retry.max_retries, config.retry.base_delay_ms
        );
        println!("────────────────────────────────────");
        println!("Cache:");
        println!(
            "Namespace: {}, memory entries: {}",
            config.cache.namespace, config.cache.memory_capacity
        );
        if config.cache.durable {
            let dir = config
                .cache
                .directory
                .clone()
                .unwrap_or_else(get_cache_dir_path);
            println!("Durable store: {dir}");
        } else {
            println!("Durable store: disabled");
        }
        println!("────────────────────────────────────");
        println!("Providers:");
        let providers = &config.providers;
        for (name, provider) in [
            ("ESPN", &providers.espn),
            ("MLB Stats", &providers.mlb_stats),
            ("SportsDataIO", &providers.sportsdata),
            ("NCAA", &providers.ncaa),
        ] {
            let leagues = provider
                .leagues
                .iter()
                .map(|s| s.label())
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "{name}: {} [{}] confidence {:.2} {}{}",
                if provider.enabled { "enabled" } else { "disabled" },
                leagues,
                provider.confidence,
                provider.base_url,
                if provider.api_key.is_some() { " (key set)" } else { "" }
            );
        }
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/sports_hub.log");
            println!("(Default location)");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without env overrides
    /// File contents only, without environment overrides. A missing file
    /// yields the defaults; an unreadable or invalid one is an error.
    pub async fn load_file_or_default(path: &str) -> Result<Self, AppError> {
        if Path::new(path).exists() {
            Self::load_from_path(path).await
        } else {
            Ok(Config::default())
        }
    }

    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
