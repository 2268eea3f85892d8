use serde::{Deserialize, Serialize};

use streakkeeper_domain::story::GlobalStory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorDto {
    pub address: String,
    pub short_address: String,
    pub word_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryDto {
    pub content: String,
    pub last_word: String,
    pub contributors: Vec<ContributorDto>,
    pub is_placeholder: bool,
}

impl From<GlobalStory> for StoryDto {
    fn from(story: GlobalStory) -> Self {
        let is_placeholder = story.is_placeholder();
        Self {
            contributors: story
                .contributors
                .into_iter()
                .map(|c| ContributorDto {
                    short_address: c.identity.short(),
                    address: c.identity.to_string(),
                    word_count: c.word_count,
                })
                .collect(),
            content: story.full_content,
            last_word: story.last_word,
            is_placeholder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedStoryPartDto {
    pub word: String,
    pub genre: String,
    pub text: String,
}
