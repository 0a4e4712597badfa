use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use sports_hub::data_fetcher::models::Sport;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Multi-league sports scores, standings and team search.
///
/// Queries every configured provider concurrently and prints one JSON reply
/// with the merged data, the sources that answered, the errors of those that
/// did not, and an aggregated confidence. Replies are cached per the data's
/// volatility: 30 s while a game is live, 5 min for other game lists and
/// standings, 1 h for teams and search.
#[derive(Parser, Debug)]
#[command(about, long_about = None, version)]
#[command(styles = get_styles())]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Bypass cached data for this request. Fresh data is still written back.
    #[arg(long = "fresh", short = 'f', global = true)]
    pub fresh: bool,

    /// Fail with a non-zero exit code when no data could be retrieved
    #[arg(long = "require-data", global = true)]
    pub require_data: bool,

    /// Pretty-print the JSON reply
    #[arg(long = "pretty", global = true)]
    pub pretty: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// Also write logs to stderr
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Games on a date across all leagues, or one league with --sport
    Games {
        /// Date in YYYY-MM-DD format. Defaults to today.
        #[arg(long, short = 'd')]
        date: Option<String>,

        /// Limit to one league: mlb, nfl, nba, nhl, ncaaf, ncaab
        #[arg(long, short = 's')]
        sport: Option<Sport>,
    },
    /// Today's games that are in progress
    Live,
    /// Standings across all leagues
    Standings {
        /// Season year. Defaults to each league's current season.
        #[arg(long)]
        season: Option<i32>,
    },
    /// Teams across all leagues
    Teams,
    /// Case-insensitive team search by name, city or abbreviation
    Search {
        query: String,
    },
}

impl Args {
    pub fn is_config_operation(&self) -> bool {
        self.list_config || self.new_log_file_path.is_some() || self.clear_log_file_path
    }
}
