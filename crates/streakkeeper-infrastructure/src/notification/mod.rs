mod telegram;

pub use telegram::TelegramBotSender;
