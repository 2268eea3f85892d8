use serde::Deserialize;

/// Chain event webhook body. Only the fields the relay reads are modelled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChainhookPayload {
    #[serde(default)]
    pub apply: Vec<AppliedBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppliedBlock {
    #[serde(default)]
    pub transactions: Vec<ChainTransaction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainTransaction {
    pub transaction_identifier: TransactionIdentifier,
    #[serde(default)]
    pub metadata: TransactionMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionIdentifier {
    pub hash: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionMetadata {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub sender: String,
}

impl ChainhookPayload {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Successful transactions of the first applied block
    pub fn successful_transactions(&self) -> impl Iterator<Item = &ChainTransaction> {
        self.apply
            .first()
            .into_iter()
            .flat_map(|block| block.transactions.iter())
            .filter(|tx| tx.metadata.success)
    }
}
