mod message_builder;
mod sender;

use crate::config::TimeoutConfig;
use crate::http::client::{HttpClient, RetryConfig};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Telegram bot API notification sender
pub struct TelegramBotSender {
    bot_token: String,
    chat_id: String,
    http: HttpClient,
}

impl TelegramBotSender {
    pub fn new(bot_token: String, chat_id: String) -> anyhow::Result<Self> {
        let http = HttpClient::with_request_timeout(
            TimeoutConfig::global().notification,
            RetryConfig::default(),
        )?;

        Ok(Self {
            bot_token,
            chat_id,
            http,
        })
    }

    fn build_send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", TELEGRAM_API_BASE, self.bot_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streakkeeper_domain::notification::NotificationMessage;

    fn sender() -> TelegramBotSender {
        TelegramBotSender::new("123:abc".to_string(), "-10042".to_string()).unwrap()
    }

    #[test]
    fn test_build_send_message_url() {
        assert_eq!(
            sender().build_send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_payload_uses_html_without_previews() {
        let message = NotificationMessage::new("STREAK KEEPER ALERT!", "Daily Check-in Success!")
            .with_link("https://explorer.hiro.so/txid/0xabc?chain=mainnet");

        let payload = sender().build_payload(&message);

        assert_eq!(payload["chat_id"], "-10042");
        assert_eq!(payload["parse_mode"], "HTML");
        assert_eq!(payload["disable_web_page_preview"], true);
        let text = payload["text"].as_str().unwrap();
        assert!(text.starts_with("<b>STREAK KEEPER ALERT!</b>"));
        assert!(text.contains("<a href=\"https://explorer.hiro.so/txid/0xabc?chain=mainnet\">"));
    }
}
