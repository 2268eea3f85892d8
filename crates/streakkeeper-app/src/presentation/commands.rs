mod alert;
mod config;
mod dashboard;
mod story;

pub use alert::{relay_check_in_alert, show_tx_link};
pub use config::{init_config, set_log_level, show_config};
pub use dashboard::{show_dashboard, show_leaderboard, show_stats, watch_leaderboard};
pub use story::{generate_story_part, show_story};

use serde::Serialize;

use crate::presentation::error::CommandError;

/// Print `value` as pretty JSON, or the human rendering otherwise
pub(crate) fn emit<T: Serialize>(
    value: &T,
    json: bool,
    render: impl FnOnce(&T) -> String,
) -> Result<(), CommandError> {
    if json {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| CommandError::infrastructure(format!("Failed to encode output: {}", e)))?;
        println!("{}", text);
    } else {
        print!("{}", render(value));
    }
    Ok(())
}
