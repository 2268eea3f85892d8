mod generation;
mod reader;

use serde::{Deserialize, Serialize};

use crate::shared::Identity;

pub use generation::{StoryGenerator, StoryRequest, DEFAULT_GENRE};
pub use reader::StoryReader;

/// Placeholder shown when the on-chain story cannot be read
pub const EMPTY_STORY_TEXT: &str = "The story is yet to be written...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryContributor {
    pub identity: Identity,
    pub word_count: u32,
}

/// The collaboratively written story as stored by the diary contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStory {
    pub full_content: String,
    pub last_word: String,
    pub contributors: Vec<StoryContributor>,
}

impl GlobalStory {
    pub fn new(full_content: impl Into<String>, last_word: impl Into<String>) -> Self {
        Self {
            full_content: full_content.into(),
            last_word: last_word.into(),
            contributors: Vec::new(),
        }
    }

    pub fn placeholder() -> Self {
        Self::new(EMPTY_STORY_TEXT, "")
    }

    /// Attach contributors, one entry per distinct identity
    pub fn with_contributors(mut self, identities: Vec<Identity>) -> Self {
        let mut contributors: Vec<StoryContributor> = Vec::with_capacity(identities.len());
        for identity in identities {
            if contributors.iter().any(|c| c.identity == identity) {
                continue;
            }
            contributors.push(StoryContributor {
                identity,
                word_count: 0,
            });
        }
        self.contributors = contributors;
        self
    }

    pub fn is_placeholder(&self) -> bool {
        self.full_content == EMPTY_STORY_TEXT && self.last_word.is_empty()
    }
}
