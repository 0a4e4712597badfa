use crate::cli::{Args, Command};
use serde::Serialize;
use sports_hub::config::Config;
use sports_hub::data_fetcher::api::CachedOrchestrator;
use sports_hub::data_fetcher::models::parse_date;
use sports_hub::error::AppError;
use sports_hub::response::ApiResponse;
use tracing::{debug, info};

/// Validates command line argument combinations.
///
/// Returns an error if incompatible arguments are used together.
pub fn validate_args(args: &Args) -> Result<(), AppError> {
    if args.new_log_file_path.is_some() && args.clear_log_file_path {
        return Err(AppError::config_error(
            "Cannot use both --set-log-file and --clear-log-file",
        ));
    }
    if args.is_config_operation() && args.command.is_some() {
        return Err(AppError::config_error(
            "Configuration flags cannot be combined with a query command",
        ));
    }
    Ok(())
}

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles configuration update commands (--set-log-file, --clear-log-file).
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    update_config_file(&Config::get_config_path(), args).await?;
    if args.clear_log_file_path {
        println!("Custom log file path cleared. Using default location.");
    }
    println!("Config updated successfully!");

    Ok(())
}

/// Rewrites the config file at `path` with the requested log path change.
/// Environment overrides are not written back, and a file that fails to
/// parse is left untouched.
async fn update_config_file(path: &str, args: &Args) -> Result<(), AppError> {
    let mut config = Config::load_file_or_default(path).await?;

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
    }

    config.save_to_path(path).await
}

/// Runs one query command and prints its JSON reply.
///
/// Validation errors are printed as a 400 reply rather than returned, the
/// same way a route handler would answer them. Returns the reply status.
pub async fn handle_query_command(
    command: &Command,
    args: &Args,
    config: &Config,
) -> Result<u16, AppError> {
    let orchestrator = CachedOrchestrator::from_config(config)?;

    let (status, output) = match execute(&orchestrator, command, args).await {
        Ok(rendered) => rendered,
        Err(e) if e.is_validation() => {
            info!("Rejected {:?}: {}", command, e);
            render(&ApiResponse::<()>::from_error(&e), args.pretty)?
        }
        Err(e) => return Err(e),
    };
    println!("{output}");

    let stats = orchestrator.cache().stats().await;
    debug!(
        "Cache stats: hits={}, misses={}, writes={}, write_failures={}",
        stats.hits, stats.misses, stats.writes, stats.write_failures
    );
    Ok(status)
}

async fn execute(
    orchestrator: &CachedOrchestrator,
    command: &Command,
    args: &Args,
) -> Result<(u16, String), AppError> {
    let fresh = args.fresh;
    let require_data = args.require_data;

    match command {
        Command::Games { date, sport } => {
            let date = date.as_deref().map(parse_date).transpose()?;
            let cached = match sport {
                Some(sport) => orchestrator.get_games_for_sport(*sport, date, fresh).await,
                None => orchestrator.get_all_games(date, fresh).await,
            };
            render(&ApiResponse::from_cached(cached, require_data), args.pretty)
        }
        Command::Live => {
            let cached = orchestrator.get_live_games(fresh).await;
            render(&ApiResponse::from_cached(cached, require_data), args.pretty)
        }
        Command::Standings { season } => {
            let cached = orchestrator.get_all_standings(*season, fresh).await?;
            render(&ApiResponse::from_cached(cached, require_data), args.pretty)
        }
        Command::Teams => {
            let cached = orchestrator.get_all_teams(fresh).await;
            render(&ApiResponse::from_cached(cached, require_data), args.pretty)
        }
        Command::Search { query } => {
            let cached = orchestrator.search(query, fresh).await?;
            render(&ApiResponse::from_cached(cached, require_data), args.pretty)
        }
    }
}

fn render<T: Serialize>(reply: &ApiResponse<T>, pretty: bool) -> Result<(u16, String), AppError> {
    let output = if pretty {
        serde_json::to_string_pretty(reply)?
    } else {
        serde_json::to_string(reply)?
    };
    Ok((reply.status, output))
}
