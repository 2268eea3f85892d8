mod check_in_alert;
mod config_service;
mod dashboard_service;
mod explorer;
mod story_service;

pub use check_in_alert::{CheckInAlertService, ChainhookPayload, ALERT_TITLE};
pub use config_service::{
    AppConfig, ConfigService, LogLevel, NetworkConfig, NotificationConfig, StoryConfig,
    DEFAULT_LEADERBOARD_CANDIDATES,
};
pub use dashboard_service::DashboardService;
pub use explorer::ExplorerLinks;
pub use story_service::StoryService;
