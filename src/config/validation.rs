use super::{Config, ProviderConfig};
use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - Timeouts must be positive and the adapter deadline must cover one HTTP request
/// - Retry count is capped at 10
/// - Every enabled provider needs an http(s) base URL and a confidence in `[0, 1]`
/// - An enabled SportsDataIO provider needs an API key
/// - The in-process cache needs room for at least one entry
/// - If a log file path is provided, it cannot be empty and its parent must be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error("HTTP timeout must be at least 1 second"));
    }
    if config.adapter_timeout_seconds < config.http_timeout_seconds {
        return Err(AppError::config_error(format!(
            "Adapter timeout ({}s) must not be shorter than the HTTP timeout ({}s)",
            config.adapter_timeout_seconds, config.http_timeout_seconds
        )));
    }
    if config.retry.max_retries > 10 {
        return Err(AppError::config_error("At most 10 retries are allowed"));
    }
    if config.cache.memory_capacity == 0 {
        return Err(AppError::config_error(
            "Cache memory capacity must be at least 1",
        ));
    }
    if config.cache.namespace.trim().is_empty() {
        return Err(AppError::config_error("Cache namespace cannot be empty"));
    }

    let providers = &config.providers;
    for (name, provider) in [
        ("espn", &providers.espn),
        ("mlb_stats", &providers.mlb_stats),
        ("sportsdata", &providers.sportsdata),
        ("ncaa", &providers.ncaa),
    ] {
        validate_provider(name, provider)?;
    }
    if providers.sportsdata.enabled
        && providers
            .sportsdata
            .api_key
            .as_deref()
            .is_none_or(|key| key.trim().is_empty())
    {
        return Err(AppError::config_error(
            "SportsDataIO is enabled but no API key is configured",
        ));
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

fn validate_provider(name: &str, provider: &ProviderConfig) -> Result<(), AppError> {
    if !provider.enabled {
        return Ok(());
    }
    if !provider.base_url.starts_with("http://") && !provider.base_url.starts_with("https://") {
        return Err(AppError::config_error(format!(
            "Provider '{name}' base URL must start with http:// or https://"
        )));
    }
    if !(0.0..=1.0).contains(&provider.confidence) {
        return Err(AppError::config_error(format!(
            "Provider '{name}' confidence must be between 0 and 1, got {}",
            provider.confidence
        )));
    }
    Ok(())
}
