use anyhow::Context;
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use streakkeeper_domain::notification::{NotificationMessage, NotificationSender};
use streakkeeper_domain::shared::DomainError;

/// `{"ok":true,...}` or `{"ok":false,"description":".."}`
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[async_trait]
impl NotificationSender for super::TelegramBotSender {
    async fn send(&self, message: &NotificationMessage) -> Result<(), DomainError> {
        let url = self.build_send_message_url();
        let payload = self.build_payload(message);

        let response: TelegramResponse = self
            .http
            .execute_with_retry("telegram sendMessage", || {
                let client = self.http.inner().clone();
                let url = url.clone();
                let payload = payload.clone();

                async move {
                    let response = client
                        .post(&url)
                        .json(&payload)
                        .send()
                        .await
                        .context("Failed to send Telegram message")?;

                    // 4xx bodies still carry the API's description
                    if response.status().is_server_error()
                        || response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS
                    {
                        response.error_for_status_ref()?;
                    }

                    response
                        .json::<TelegramResponse>()
                        .await
                        .context("Failed to parse Telegram response")
                }
            })
            .await
            .map_err(|e| {
                DomainError::Infrastructure(format!("Telegram notification failed: {:#}", e))
            })?;

        if !response.ok {
            return Err(DomainError::Infrastructure(format!(
                "Telegram API rejected message: {}",
                response
                    .description
                    .unwrap_or_else(|| "Unknown error".to_string())
            )));
        }

        debug!("[alert] telegram message delivered to chat {}", self.chat_id);
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "telegram"
    }
}
