use anyhow::Context;
use std::path::Path;

use streakkeeper_domain::shared::TxId;

use super::emit;
use crate::application::services::ChainhookPayload;
use crate::application::ResultExt;
use crate::presentation::bootstrap::Services;
use crate::presentation::error::CommandError;
use crate::presentation::render::render_alert_report;

/// Relay a chainhook delivery read from `payload_path`, or stdin for `-`
pub async fn relay_check_in_alert(
    services: &Services,
    payload_path: &Path,
    json: bool,
) -> Result<(), CommandError> {
    let raw = if payload_path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())
            .context("Failed to read payload from stdin")
            .to_infra_err()?
    } else {
        std::fs::read_to_string(payload_path)
            .with_context(|| format!("Failed to read payload {}", payload_path.display()))
            .to_infra_err()?
    };

    let payload = ChainhookPayload::from_json(&raw)
        .map_err(|e| CommandError::validation(format!("Invalid chainhook payload: {}", e)))?;

    let report = services.alerts.relay(&payload).await;
    emit(&report, json, |report| format!("{}\n", render_alert_report(report)))
}

pub fn show_tx_link(services: &Services, tx_id: &str) -> Result<(), CommandError> {
    let tx_id = TxId::from_string(tx_id);
    if tx_id.is_empty() {
        return Err(CommandError::validation("transaction id must not be empty"));
    }
    println!("{}", services.links.tx_url(&tx_id));
    Ok(())
}
