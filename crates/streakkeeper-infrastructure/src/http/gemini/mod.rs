mod types;

use anyhow::Context;
use async_trait::async_trait;
use log::{info, warn};
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::instrument;

use streakkeeper_domain::shared::DomainError;
use streakkeeper_domain::story::{StoryGenerator, StoryRequest};

use crate::config::TimeoutConfig;
use crate::http::client::{HttpClient, RetryConfig};
use types::{GenerateContentRequest, GenerateContentResponse};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ATTEMPTS: u32 = 3;
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Failure of a single generation attempt
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("rate limited (HTTP 429)")]
    RateLimited,

    #[error(transparent)]
    Request(#[from] anyhow::Error),
}

/// Wait before retry number `attempt + 1`: 2s, 4s, 8s, ...
pub fn rate_limit_backoff(attempt: u32) -> Duration {
    Duration::from_millis(2u64.saturating_pow(attempt.saturating_add(1)).saturating_mul(1000))
}

/// Run `attempt_fn` up to `attempts` times, sleeping between tries only when
/// the backend reports a rate limit. Other errors end the loop immediately.
pub async fn retry_on_rate_limit<F, Fut, T>(
    attempts: u32,
    mut attempt_fn: F,
) -> Result<T, GenerationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GenerationError>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 0;

    loop {
        match attempt_fn().await {
            Err(GenerationError::RateLimited) if attempt + 1 < attempts => {
                let wait = rate_limit_backoff(attempt);
                warn!(
                    "[story] rate limit hit (attempt {}/{}), retrying in {}ms",
                    attempt + 1,
                    attempts,
                    wait.as_millis()
                );
                sleep(wait).await;
                attempt += 1;
            }
            outcome => return outcome,
        }
    }
}

/// Story generator backed by the Gemini `generateContent` API
pub struct GeminiStoryClient {
    http: HttpClient,
    api_key: Option<String>,
    model: String,
    attempts: u32,
    base_url: String,
}

impl GeminiStoryClient {
    pub fn new(api_key: Option<String>, model: Option<String>, attempts: u32) -> anyhow::Result<Self> {
        let http = HttpClient::with_request_timeout(
            TimeoutConfig::global().story_generation,
            RetryConfig::none(),
        )?;

        Ok(Self {
            http,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            attempts,
            base_url: API_BASE_URL.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn request_text(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> Result<Option<String>, GenerationError> {
        let response = self
            .http
            .inner()
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest::from_prompt(prompt.to_string()))
            .send()
            .await
            .context("Failed to send generateContent request")?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(GenerationError::RateLimited);
        }

        let body: GenerateContentResponse = response
            .error_for_status()
            .context("generateContent returned an error status")?
            .json()
            .await
            .context("Failed to parse generateContent response")?;

        Ok(body.text())
    }
}

#[async_trait]
impl StoryGenerator for GeminiStoryClient {
    #[instrument(skip(self, request), fields(word = %request.word(), genre = %request.genre()))]
    async fn generate(&self, request: &StoryRequest) -> Result<String, DomainError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("[story] no API key configured, skipping generation");
            return Ok(request.missing_key_text());
        };

        let prompt = request.prompt();
        let outcome =
            retry_on_rate_limit(self.attempts, || self.request_text(api_key, &prompt)).await;

        let text = match outcome {
            Ok(Some(text)) => {
                info!("[story] generated {} chars with {}", text.len(), self.model);
                text
            }
            Ok(None) => {
                warn!("[story] model returned no text");
                request.empty_response_text()
            }
            Err(GenerationError::RateLimited) => {
                warn!("[story] still rate limited after {} attempts", self.attempts.max(1));
                request.rate_limited_text()
            }
            Err(GenerationError::Request(e)) => {
                warn!("[story] generation failed: {:#}", e);
                request.fallback_text()
            }
        };

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    #[test]
    fn test_backoff_schedule() {
        assert_eq!(rate_limit_backoff(0), Duration::from_secs(2));
        assert_eq!(rate_limit_backoff(1), Duration::from_secs(4));
        assert_eq!(rate_limit_backoff(2), Duration::from_secs(8));
    }

    #[test]
    fn test_default_model_and_endpoint() {
        let client = GeminiStoryClient::new(Some("key".to_string()), None, 3).unwrap();
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_returns_pause_text() {
        let client = GeminiStoryClient::new(Some("  ".to_string()), None, 3).unwrap();
        let request = StoryRequest::new("dragon", "", None).unwrap();

        let text = client.generate(&request).await.unwrap();
        assert_eq!(text, "The story paused. (Error: Missing API Key)");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_retries_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = Instant::now();

        let counter = calls.clone();
        let result = retry_on_rate_limit(3, move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(GenerationError::RateLimited)
                } else {
                    Ok("next part")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "next part");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(6) && waited < Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_on_last_attempt_is_reported() {
        let calls = Arc::new(AtomicU32::new(0));

        let counter = calls.clone();
        let result: Result<(), _> = retry_on_rate_limit(2, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(GenerationError::RateLimited)
            }
        })
        .await;

        assert!(matches!(result, Err(GenerationError::RateLimited)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = Instant::now();

        let counter = calls.clone();
        let result: Result<(), _> = retry_on_rate_limit(3, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(GenerationError::Request(anyhow::anyhow!("bad request")))
            }
        })
        .await;

        assert!(matches!(result, Err(GenerationError::Request(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
