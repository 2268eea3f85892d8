use serde::{Deserialize, Serialize};

/// Read-only call body for `/v2/contracts/call-read`
#[derive(Debug, Clone, Serialize)]
pub(super) struct ReadOnlyRequest {
    pub sender: String,
    pub arguments: Vec<String>,
}

/// `{"okay":true,"result":"0x.."}` or `{"okay":false,"cause":".."}`
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ReadOnlyResponse {
    pub okay: bool,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub cause: Option<String>,
}

/// Deployed contracts the dashboard reads from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StacksContracts {
    /// Deployer address shared by both contracts
    pub address: String,
    pub streak_contract: String,
    pub diary_contract: String,
}

impl Default for StacksContracts {
    fn default() -> Self {
        Self {
            address: "SPHMWZQ1KW03KHYPADC81Q6XXS284S7QCHRAS3A8".to_string(),
            streak_contract: "teeboo-streak".to_string(),
            diary_contract: "diary-v1".to_string(),
        }
    }
}
