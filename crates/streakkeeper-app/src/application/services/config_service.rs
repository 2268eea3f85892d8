use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use streakkeeper_domain::shared::Identity;
use streakkeeper_infrastructure::http::gemini::{DEFAULT_ATTEMPTS, DEFAULT_MODEL};
use streakkeeper_infrastructure::http::stacks::DEFAULT_API_BASE_URL;
use streakkeeper_infrastructure::http::StacksContracts;

const CONFIG_DIR_NAME: &str = "streakkeeper";
const CONFIG_FILE_NAME: &str = "config.json";

/// Participants ranked on the leaderboard when none are configured
pub const DEFAULT_LEADERBOARD_CANDIDATES: [&str; 5] = [
    "SP3FBR2AGK5H9QBDH3EEN6DF8EK8JY7RX8QJ5SVTE",
    "SP1P72Z3704VMT3DMHPP2CB8TGQWGDBHD3RPR9GZS",
    "SP2J6EF482VRV4K497Z538TNC2EAJPJ4F81963F01",
    "SP3D6PV2ACBPEKYJTCMH7HEN02KP87QSP8KTEH335",
    "SPHMWZQ1KW03KHYPADC81Q6XXS284S7QCHRAS3A8",
];

/// Log level configuration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub api_base_url: String,
    pub network: String,
    pub explorer_base_url: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            network: "mainnet".to_string(),
            explorer_base_url: "https://explorer.hiro.so".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractsConfig {
    pub address: String,
    pub streak_contract: String,
    pub diary_contract: String,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        let contracts = StacksContracts::default();
        Self {
            address: contracts.address,
            streak_contract: contracts.streak_contract,
            diary_contract: contracts.diary_contract,
        }
    }
}

impl From<&ContractsConfig> for StacksContracts {
    fn from(config: &ContractsConfig) -> Self {
        Self {
            address: config.address.clone(),
            streak_contract: config.streak_contract.clone(),
            diary_contract: config.diary_contract.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub candidates: Vec<String>,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_LEADERBOARD_CANDIDATES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl LeaderboardConfig {
    pub fn candidate_identities(&self) -> Vec<Identity> {
        self.candidates
            .iter()
            .map(|s| Identity::from_string(s))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    pub model: String,
    pub genre: String,
    /// Attempts per generation when the backend is rate limiting
    pub retries: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            genre: "fantasy".to_string(),
            retries: DEFAULT_ATTEMPTS,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_bot_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_chat_id: Option<String>,
}

impl NotificationConfig {
    /// Bot token and chat id, when both are present
    pub fn telegram(&self) -> Option<(&str, &str)> {
        let token = self.telegram_bot_token.as_deref().filter(|t| !t.is_empty())?;
        let chat_id = self.telegram_chat_id.as_deref().filter(|c| !c.is_empty())?;
        Some((token, chat_id))
    }
}

/// Persistent configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub contracts: ContractsConfig,
    pub leaderboard: LeaderboardConfig,
    pub story: StoryConfig,
    pub notification: NotificationConfig,
    pub log_level: LogLevel,
}

impl AppConfig {
    /// Apply secrets and endpoints supplied through the environment
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("GEMINI_API_KEY").or_else(|| get("API_KEY")) {
            self.story.api_key = Some(key);
        }
        if let Some(token) = get("TELEGRAM_BOT_TOKEN") {
            self.notification.telegram_bot_token = Some(token);
        }
        if let Some(chat_id) = get("TELEGRAM_CHAT_ID") {
            self.notification.telegram_chat_id = Some(chat_id);
        }
        if let Some(url) = get("STREAKKEEPER_API_URL") {
            self.network.api_base_url = url;
        }
    }
}

/// Application configuration service
///
/// Keeps the file contents apart from the effective configuration so that
/// saving never writes environment-supplied secrets to disk.
pub struct ConfigService {
    stored: AppConfig,
    effective: AppConfig,
    config_path: PathBuf,
}

impl ConfigService {
    /// `{config_dir}/streakkeeper/config.json`
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Failed to resolve the user config directory"))?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// `{data_dir}/streakkeeper/logs`, or the temp dir when there is no data dir
    pub fn default_log_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(CONFIG_DIR_NAME)
            .join("logs")
    }

    /// Load from `path` (or the default location) and apply process environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_config_path()?,
        };
        Self::load_with_env(config_path, |name| std::env::var(name).ok())
    }

    pub fn load_with_env<F>(config_path: PathBuf, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let stored = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
            serde_json::from_str::<AppConfig>(&content)
                .with_context(|| format!("Invalid config file {}", config_path.display()))?
        } else {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        };

        let mut effective = stored.clone();
        effective.apply_env_overrides(lookup);

        Ok(Self {
            stored,
            effective,
            config_path,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.effective
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.effective.log_level
    }

    /// Set log level and persist to disk
    pub fn set_log_level(&mut self, level: LogLevel) -> Result<()> {
        self.stored.log_level = level;
        self.effective.log_level = level;
        self.save()?;
        info!("Log level set to {}", level.as_str());
        Ok(())
    }

    /// Write the file-backed configuration as pretty JSON
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(&self.stored)?;
        std::fs::write(&self.config_path, content)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))?;

        info!("Config saved to {}", self.config_path.display());
        Ok(())
    }
}
