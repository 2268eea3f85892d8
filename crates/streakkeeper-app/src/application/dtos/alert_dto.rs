use serde::{Deserialize, Serialize};

/// Outcome of relaying one webhook payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertReportDto {
    /// Successful check-in transactions found in the payload
    pub alerts: usize,
    /// Deliveries accepted by a channel
    pub sent: usize,
    pub failed: usize,
    /// Alerts dropped because no channel is configured
    pub skipped: usize,
}
