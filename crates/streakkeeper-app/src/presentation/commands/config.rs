use crate::application::services::{ConfigService, LogLevel};
use crate::presentation::error::CommandError;

/// Print the effective configuration with secrets masked
pub fn show_config(config: &ConfigService) -> Result<(), CommandError> {
    let mut effective = config.config().clone();
    mask(&mut effective.story.api_key);
    mask(&mut effective.notification.telegram_bot_token);

    let text = serde_json::to_string_pretty(&effective)
        .map_err(|e| CommandError::infrastructure(format!("Failed to encode config: {}", e)))?;
    println!("# {}", config.config_path().display());
    println!("{}", text);
    Ok(())
}

fn mask(secret: &mut Option<String>) {
    if secret.is_some() {
        *secret = Some("********".to_string());
    }
}

/// Write the file-backed configuration, creating it with defaults if missing
pub fn init_config(config: &ConfigService) -> Result<(), CommandError> {
    config.save()?;
    println!("{}", config.config_path().display());
    Ok(())
}

pub fn set_log_level(config: &mut ConfigService, level: &str) -> Result<(), CommandError> {
    let log_level: LogLevel = level.parse().map_err(|_| {
        CommandError::validation(
            "Invalid log level. Must be one of: error, warn, info, debug, trace",
        )
    })?;

    config
        .set_log_level(log_level)
        .map_err(|e| CommandError::infrastructure(format!("Failed to save log level: {:#}", e)))?;
    Ok(())
}
