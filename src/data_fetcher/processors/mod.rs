pub mod game_status;
pub mod time_formatting;

pub use game_status::{map_espn_status, map_mlb_status, map_ncaa_status, map_sportsdata_status};
pub use time_formatting::{
    local_today, parse_epoch_seconds, parse_score, parse_timestamp, start_of_day,
};
