mod sender;

pub use sender::{NotificationMessage, NotificationSender};
