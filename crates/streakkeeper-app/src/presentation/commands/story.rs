use super::emit;
use crate::presentation::bootstrap::Services;
use crate::presentation::error::CommandError;
use crate::presentation::render::render_story;

pub async fn show_story(services: &Services, json: bool) -> Result<(), CommandError> {
    let story = services.story.get_story().await;
    emit(&story, json, render_story)
}

pub async fn generate_story_part(
    services: &Services,
    word: &str,
    genre: Option<&str>,
    json: bool,
) -> Result<(), CommandError> {
    let part = services.story.generate_next_part(word, genre).await?;
    emit(&part, json, |part| format!("{}\n", part.text))
}
