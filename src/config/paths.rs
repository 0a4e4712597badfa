use std::path::{Path, PathBuf};

const APP_DIR: &str = "sports_hub";

fn app_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR)
}

/// Returns the platform-specific path for the config file.
///
/// # Notes
/// - Uses platform-specific config directory (e.g., ~/.config on Linux)
/// - Falls back to current directory if config directory is unavailable
pub fn get_config_path() -> String {
    app_dir().join("config.toml").to_string_lossy().to_string()
}

/// Returns the platform-specific path for the log directory.
pub fn get_log_dir_path() -> String {
    app_dir().join("logs").to_string_lossy().to_string()
}

/// Returns the default directory of the durable cache store.
///
/// Prefers the platform cache directory (e.g., ~/.cache on Linux) and falls
/// back to a `cache` folder next to the config file.
pub fn get_cache_dir_path() -> String {
    dirs::cache_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| app_dir().join("cache"))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_live_under_app_dir() {
        assert!(get_config_path().contains(APP_DIR));
        assert!(get_config_path().ends_with("config.toml"));
        assert!(get_log_dir_path().ends_with("logs"));
        assert!(get_cache_dir_path().contains(APP_DIR));
    }
}
