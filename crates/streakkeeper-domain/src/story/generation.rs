use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::DomainError;

pub const DEFAULT_GENRE: &str = "general";
const STORY_OPENING: &str = "The journey began.";

/// Input for drafting the next part of the story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRequest {
    word: String,
    current_story: String,
    genre: String,
}

impl StoryRequest {
    /// Only the first whitespace-separated token of `word` is kept.
    pub fn new(
        word: &str,
        current_story: impl Into<String>,
        genre: Option<&str>,
    ) -> Result<Self, DomainError> {
        let word = word
            .split_whitespace()
            .next()
            .ok_or_else(|| DomainError::InvalidInput("Story word cannot be empty".to_string()))?;

        let genre = genre
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(DEFAULT_GENRE);

        Ok(Self {
            word: word.to_string(),
            current_story: current_story.into(),
            genre: genre.to_string(),
        })
    }

    /// Same request continuing `current_story`
    pub fn with_current_story(mut self, current_story: impl Into<String>) -> Self {
        self.current_story = current_story.into();
        self
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn current_story(&self) -> &str {
        &self.current_story
    }

    pub fn prompt(&self) -> String {
        let story = if self.current_story.trim().is_empty() {
            STORY_OPENING
        } else {
            self.current_story.as_str()
        };

        format!(
            "Task: Continue a collaborative story.\n\
             Genre: {genre}\n\
             New Word to include: \"{word}\"\n\
             Existing Story: \"{story}\"\n\n\
             Instruction: Write the NEXT SHORT PART of the story (max 2 sentences) that naturally incorporates the word \"{word}\".\n\
             The tone should match the genre \"{genre}\".\n\
             Return only the new text segment, nothing else.",
            genre = self.genre,
            word = self.word,
            story = story,
        )
    }

    pub fn missing_key_text(&self) -> String {
        "The story paused. (Error: Missing API Key)".to_string()
    }

    pub fn empty_response_text(&self) -> String {
        format!("And then, the {} changed everything.", self.word)
    }

    pub fn rate_limited_text(&self) -> String {
        format!(
            "[Limit Hit] The {} appeared, but the narrator needed a moment to breathe.",
            self.word
        )
    }

    pub fn fallback_text(&self) -> String {
        format!("Suddenly, a {} appeared on the horizon.", self.word)
    }
}

/// Drafts story continuations with a generative text backend.
///
/// Implementations degrade to a fallback sentence instead of failing; only
/// invalid requests are errors.
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    async fn generate(&self, request: &StoryRequest) -> Result<String, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_keeps_first_word_only() {
        let request = StoryRequest::new("  dragon fire", "", Some("fantasy")).unwrap();
        assert_eq!(request.word(), "dragon");
        assert_eq!(request.genre(), "fantasy");
    }

    #[test]
    fn test_empty_word_rejected() {
        let result = StoryRequest::new("   ", "story", None);
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_genre_defaults_to_general() {
        let request = StoryRequest::new("moon", "", None).unwrap();
        assert_eq!(request.genre(), DEFAULT_GENRE);

        let request = StoryRequest::new("moon", "", Some(" ")).unwrap();
        assert_eq!(request.genre(), DEFAULT_GENRE);
    }

    #[test]
    fn test_prompt_uses_opening_for_empty_story() {
        let prompt = StoryRequest::new("moon", "", Some("mystery"))
            .unwrap()
            .prompt();
        assert!(prompt.contains("Existing Story: \"The journey began.\""));
        assert!(prompt.contains("New Word to include: \"moon\""));
        assert!(prompt.contains("Genre: mystery"));
    }

    #[test]
    fn test_prompt_includes_existing_story() {
        let prompt = StoryRequest::new("moon", "A knight rode north.", None)
            .unwrap()
            .prompt();
        assert!(prompt.contains("Existing Story: \"A knight rode north.\""));
        assert!(prompt.contains("max 2 sentences"));
    }

    #[test]
    fn test_fallback_texts_mention_word() {
        let request = StoryRequest::new("lantern", "", None).unwrap();
        assert_eq!(
            request.empty_response_text(),
            "And then, the lantern changed everything."
        );
        assert_eq!(
            request.fallback_text(),
            "Suddenly, a lantern appeared on the horizon."
        );
        assert!(request.rate_limited_text().starts_with("[Limit Hit] The lantern"));
        assert_eq!(
            request.missing_key_text(),
            "The story paused. (Error: Missing API Key)"
        );
    }
}
