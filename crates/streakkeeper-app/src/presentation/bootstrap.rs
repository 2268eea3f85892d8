use anyhow::{Context, Result};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Instant;

use streakkeeper_domain::notification::NotificationSender;
use streakkeeper_domain::story::{StoryGenerator, StoryReader};
use streakkeeper_domain::streak::UserStatisticsSource;
use streakkeeper_infrastructure::http::{GeminiStoryClient, HttpClient, StacksApiClient};
use streakkeeper_infrastructure::notification::TelegramBotSender;

use crate::application::services::{
    AppConfig, CheckInAlertService, DashboardService, ExplorerLinks, StoryService,
};

/// Services wired against the live ledger, story backend and alert channels
pub struct Services {
    pub dashboard: DashboardService,
    pub story: StoryService,
    pub alerts: CheckInAlertService,
    pub links: ExplorerLinks,
}

pub fn build_services(config: &AppConfig) -> Result<Services> {
    let started_at = Instant::now();

    let http = HttpClient::new().context("Failed to build HTTP client")?;
    let stacks = Arc::new(StacksApiClient::new(
        http,
        &config.network.api_base_url,
        (&config.contracts).into(),
    )?);
    debug!(
        "✓ Ledger client ready: {} ({})",
        config.network.api_base_url, config.network.network
    );

    let gemini = GeminiStoryClient::new(
        config.story.api_key.clone(),
        Some(config.story.model.clone()),
        config.story.retries,
    )?;
    if config.story.api_key.is_none() {
        warn!("[story] no API key configured, story generation is disabled");
    }

    let mut senders: Vec<Arc<dyn NotificationSender>> = Vec::new();
    if let Some((token, chat_id)) = config.notification.telegram() {
        senders.push(Arc::new(TelegramBotSender::new(
            token.to_string(),
            chat_id.to_string(),
        )?));
    }

    let links = ExplorerLinks::from_config(&config.network);
    let statistics_source = stacks.clone() as Arc<dyn UserStatisticsSource>;
    let story_reader = stacks as Arc<dyn StoryReader>;
    let story_generator = Arc::new(gemini) as Arc<dyn StoryGenerator>;

    let services = Services {
        dashboard: DashboardService::new(
            statistics_source,
            config.leaderboard.candidate_identities(),
        ),
        story: StoryService::new(story_reader, story_generator, config.story.genre.clone()),
        alerts: CheckInAlertService::new(senders, links.clone()),
        links,
    };

    debug!(
        "✓ Services initialized ({}ms)",
        started_at.elapsed().as_millis()
    );
    Ok(services)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_defaults() {
        let services = build_services(&AppConfig::default()).unwrap();
        assert_eq!(services.dashboard.candidates().len(), 5);
    }

    #[test]
    fn test_invalid_api_url_is_rejected() {
        let mut config = AppConfig::default();
        config.network.api_base_url = "not a url".to_string();
        assert!(build_services(&config).is_err());
    }
}
