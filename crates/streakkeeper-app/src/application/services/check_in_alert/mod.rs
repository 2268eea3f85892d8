mod payload;

pub use payload::ChainhookPayload;

use payload::ChainTransaction;

use log::{error, info, warn};
use std::sync::Arc;

use streakkeeper_domain::notification::{NotificationMessage, NotificationSender};
use streakkeeper_domain::shared::{Identity, TxId};

use super::explorer::ExplorerLinks;
use crate::application::dtos::AlertReportDto;

pub const ALERT_TITLE: &str = "STREAK KEEPER ALERT!";
const ALERT_ACTION: &str = "Daily Check-in Success!";

/// Relays successful check-in transactions to the configured channels
pub struct CheckInAlertService {
    senders: Vec<Arc<dyn NotificationSender>>,
    links: ExplorerLinks,
}

impl CheckInAlertService {
    pub fn new(senders: Vec<Arc<dyn NotificationSender>>, links: ExplorerLinks) -> Self {
        Self { senders, links }
    }

    /// One alert per successful transaction of the first applied block
    pub fn build_alerts(&self, payload: &ChainhookPayload) -> Vec<NotificationMessage> {
        payload
            .successful_transactions()
            .map(|tx| self.build_alert(tx))
            .collect()
    }

    fn build_alert(&self, tx: &ChainTransaction) -> NotificationMessage {
        let sender = Identity::from_string(&tx.metadata.sender);
        let tx_id = TxId::from_string(&tx.transaction_identifier.hash);

        let content = format!(
            "User: {}\nAction: {}\n\nKeep the streak alive!",
            sender.short(),
            ALERT_ACTION
        );

        NotificationMessage::new(ALERT_TITLE, content).with_link(self.links.tx_url(&tx_id))
    }

    /// Send every alert through every channel. One failed delivery never
    /// stops the others.
    pub async fn relay(&self, payload: &ChainhookPayload) -> AlertReportDto {
        let alerts = self.build_alerts(payload);
        let mut report = AlertReportDto {
            alerts: alerts.len(),
            ..AlertReportDto::default()
        };

        if alerts.is_empty() {
            info!("[alert] no successful check-ins in payload");
            return report;
        }

        if self.senders.is_empty() {
            warn!(
                "[alert] missing Telegram configuration, skipping {} alert(s)",
                alerts.len()
            );
            report.skipped = alerts.len();
            return report;
        }

        for message in &alerts {
            for sender in &self.senders {
                match sender.send(message).await {
                    Ok(()) => {
                        report.sent += 1;
                        info!(
                            "[alert] sent via {}: {}",
                            sender.channel(),
                            message.link.as_deref().unwrap_or_default()
                        );
                    }
                    Err(e) => {
                        report.failed += 1;
                        error!(
                            "[alert] delivery via {} failed: {}",
                            sender.channel(),
                            e.format_with_code()
                        );
                    }
                }
            }
        }

        report
    }
}
