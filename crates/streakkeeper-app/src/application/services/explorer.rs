use streakkeeper_domain::shared::TxId;

use super::config_service::NetworkConfig;

/// Builds block explorer URLs for submitted transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerLinks {
    base_url: String,
    network: String,
}

impl ExplorerLinks {
    pub fn new(base_url: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            network: network.into(),
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(config.explorer_base_url.as_str(), config.network.as_str())
    }

    pub fn tx_url(&self, tx_id: &TxId) -> String {
        format!("{}/txid/{}?chain={}", self.base_url, tx_id, self.network)
    }
}

impl Default for ExplorerLinks {
    fn default() -> Self {
        Self::from_config(&NetworkConfig::default())
    }
}
