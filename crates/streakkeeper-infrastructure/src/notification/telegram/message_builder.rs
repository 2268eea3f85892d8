use serde_json::json;

use streakkeeper_domain::notification::NotificationMessage;

/// Escape the characters Telegram's HTML parse mode treats as markup
pub(super) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

impl super::TelegramBotSender {
    /// Render a message as Telegram HTML: bold title, body, explorer link
    pub(super) fn render_html(&self, message: &NotificationMessage) -> String {
        let mut text = format!(
            "<b>{}</b>\n\n{}",
            escape_html(&message.title),
            escape_html(&message.content)
        );

        if let Some(link) = &message.link {
            text.push_str(&format!(
                "\n\n<a href=\"{}\">View on Explorer</a>",
                escape_html(link)
            ));
        }

        text
    }

    pub(super) fn build_payload(&self, message: &NotificationMessage) -> serde_json::Value {
        json!({
            "chat_id": self.chat_id,
            "text": self.render_html(message),
            "parse_mode": "HTML",
            "disable_web_page_preview": true
        })
    }
}
