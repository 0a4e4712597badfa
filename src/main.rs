// src/main.rs
mod cli;
mod commands;
mod logging;

use clap::{CommandFactory, Parser};
use cli::Args;
use commands::{
    handle_config_update_command, handle_list_config_command, handle_query_command, validate_args,
};
use logging::setup_logging;
use sports_hub::config::Config;
use sports_hub::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    validate_args(&args)?;

    // Configuration operations run before logging is set up
    if args.list_config {
        return handle_list_config_command().await;
    }
    if args.new_log_file_path.is_some() || args.clear_log_file_path {
        return handle_config_update_command(&args).await;
    }

    // Load config first to fail early if there's an issue
    let config = Config::load().await?;

    let (log_file_path, guard) = setup_logging(&args, &config).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    let Some(command) = &args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    let status = handle_query_command(command, &args, &config).await?;
    if !(200..300).contains(&status) {
        tracing::warn!("Request finished with status {status}");
        // Flush the log file before exiting without unwinding
        drop(guard);
        std::process::exit(1);
    }

    Ok(())
}
