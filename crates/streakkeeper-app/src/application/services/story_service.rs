use log::{info, warn};
use std::sync::Arc;

use streakkeeper_domain::shared::DomainError;
use streakkeeper_domain::story::{GlobalStory, StoryGenerator, StoryReader, StoryRequest};

use crate::application::dtos::{GeneratedStoryPartDto, StoryDto};

/// Reads the shared on-chain story and drafts its next part
pub struct StoryService {
    reader: Arc<dyn StoryReader>,
    generator: Arc<dyn StoryGenerator>,
    default_genre: String,
}

impl StoryService {
    pub fn new(
        reader: Arc<dyn StoryReader>,
        generator: Arc<dyn StoryGenerator>,
        default_genre: impl Into<String>,
    ) -> Self {
        Self {
            reader,
            generator,
            default_genre: default_genre.into(),
        }
    }

    /// The story with its contributors. Never fails: an unreadable story is
    /// replaced by the placeholder and unreadable contributors by an empty list.
    pub async fn get_story(&self) -> StoryDto {
        self.load_story().await.into()
    }

    async fn load_story(&self) -> GlobalStory {
        let (story, contributors) = tokio::join!(
            self.reader.fetch_global_story(),
            self.reader.fetch_contributors()
        );

        let story = story.unwrap_or_else(|e| {
            warn!("[story] falling back to placeholder story: {}", e.format_with_code());
            GlobalStory::placeholder()
        });
        let contributors = contributors.unwrap_or_else(|e| {
            warn!("[story] contributors unavailable: {}", e.format_with_code());
            Vec::new()
        });

        story.with_contributors(contributors)
    }

    /// Draft the next part of the story around `word`
    pub async fn generate_next_part(
        &self,
        word: &str,
        genre: Option<&str>,
    ) -> Result<GeneratedStoryPartDto, DomainError> {
        let genre = genre.unwrap_or(self.default_genre.as_str());
        let request = StoryRequest::new(word, String::new(), Some(genre))?;

        let story = match self.reader.fetch_global_story().await {
            Ok(story) => story,
            Err(e) => {
                warn!("[story] drafting without the current story: {}", e.format_with_code());
                GlobalStory::placeholder()
            }
        };
        // The placeholder is not part of the story; the prompt has its own opening
        let request = if story.is_placeholder() {
            request
        } else {
            request.with_current_story(story.full_content)
        };

        let text = self.generator.generate(&request).await?;
        info!("[story] drafted next part for word {}", request.word());

        Ok(GeneratedStoryPartDto {
            word: request.word().to_string(),
            genre: request.genre().to_string(),
            text,
        })
    }
}
