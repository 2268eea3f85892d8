use async_trait::async_trait;

use crate::shared::{DomainError, Identity};

use super::GlobalStory;

/// Read access to the diary contract
#[async_trait]
pub trait StoryReader: Send + Sync {
    /// Current story text and last minted word, without contributors
    async fn fetch_global_story(&self) -> Result<GlobalStory, DomainError>;

    async fn fetch_contributors(&self) -> Result<Vec<Identity>, DomainError>;
}
