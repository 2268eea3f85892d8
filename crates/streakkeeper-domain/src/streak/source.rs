use async_trait::async_trait;

use super::StatisticsLookup;
use crate::shared::{DomainError, Identity};

/// Read access to per-identity streak statistics held by the ledger
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStatisticsSource: Send + Sync {
    /// Fetch the statistics record of one identity.
    ///
    /// An identity the ledger has never seen is `Ok(StatisticsLookup::NotFound)`.
    /// Network or protocol failures are `Err(DomainError::Transport)`; an
    /// unexpected response shape is `Err(DomainError::Deserialization)`.
    async fn fetch_user_statistics(
        &self,
        identity: &Identity,
    ) -> Result<StatisticsLookup, DomainError>;
}
