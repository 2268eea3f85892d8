mod types;

pub use types::{RetryConfig, USER_AGENT};

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::TimeoutConfig;

/// Shared reqwest client with retry for transient failures
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) client: Client,
    pub(crate) retry_config: RetryConfig,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_config(TimeoutConfig::global(), RetryConfig::default())
    }

    pub fn with_config(timeouts: &TimeoutConfig, retry_config: RetryConfig) -> Result<Self> {
        Self::build(timeouts.http_request, timeouts.http_connect, retry_config)
    }

    /// Client with a custom whole-request timeout
    pub fn with_request_timeout(request_timeout: Duration, retry_config: RetryConfig) -> Result<Self> {
        Self::build(
            request_timeout,
            TimeoutConfig::global().http_connect,
            retry_config,
        )
    }

    fn build(request_timeout: Duration, connect_timeout: Duration, retry_config: RetryConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            retry_config,
        })
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Execute a request with retry logic
    ///
    /// Retries on:
    /// - Network errors (connection failures, timeouts)
    /// - 5xx server errors
    /// - 429 Too Many Requests
    ///
    /// Does NOT retry on:
    /// - 4xx client errors (except 429)
    /// - Errors that are not reqwest errors (decoding, validation)
    pub async fn execute_with_retry<F, Fut, T>(&self, operation_name: &str, mut request_fn: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        let mut backoff_ms = self.retry_config.initial_backoff_ms;

        loop {
            attempt += 1;

            match request_fn().await {
                Ok(response) => {
                    if attempt > 1 {
                        debug!("{} succeeded after {} attempts", operation_name, attempt);
                    }
                    return Ok(response);
                }
                Err(e) => {
                    let should_retry =
                        attempt <= self.retry_config.max_retries && Self::is_retryable_error(&e);

                    if !should_retry {
                        if attempt > 1 {
                            warn!("{} failed after {} attempts", operation_name, attempt);
                        }
                        return Err(e);
                    }

                    warn!(
                        "{} failed (attempt {}/{}): {}. Retrying in {}ms...",
                        operation_name,
                        attempt,
                        self.retry_config.max_retries + 1,
                        e,
                        backoff_ms
                    );

                    sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms = self.retry_config.next_backoff_ms(backoff_ms);
                }
            }
        }
    }

    /// Check if an error is retryable
    pub fn is_retryable_error(error: &anyhow::Error) -> bool {
        let Some(reqwest_err) = error
            .chain()
            .find_map(|cause| cause.downcast_ref::<reqwest::Error>())
        else {
            return false;
        };

        if reqwest_err.is_connect() || reqwest_err.is_timeout() || reqwest_err.is_request() {
            return true;
        }

        reqwest_err
            .status()
            .is_some_and(|status| status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_retry(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_backoff_ms: 1,
            max_backoff_ms: 2,
            backoff_multiplier: 2.0,
        }
    }

    #[tokio::test]
    async fn test_http_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_non_transport_errors_are_not_retried() {
        let client = HttpClient::with_config(TimeoutConfig::global(), fast_retry(3)).unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let counter = calls.clone();
        let result: Result<()> = client
            .execute_with_retry("decode", move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    anyhow::bail!("malformed payload")
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    /// Local server answering every request with `status` and an empty body
    async fn serve_status(status: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    status
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}/", addr)
    }

    async fn count_attempts(client: &HttpClient, url: &str) -> (Result<()>, u32) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result = client
            .execute_with_retry("get", || {
                let counter = counter.clone();
                let request = client.inner().get(url);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    request.send().await?.error_for_status()?;
                    Ok::<(), anyhow::Error>(())
                }
            })
            .await;
        (result, calls.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn test_connect_refused_is_retried() {
        let client = HttpClient::with_config(TimeoutConfig::global(), fast_retry(2)).unwrap();

        let (result, attempts) = count_attempts(&client, "http://127.0.0.1:1/").await;

        let err = result.unwrap_err();
        assert!(HttpClient::is_retryable_error(&err));
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let client = HttpClient::with_config(TimeoutConfig::global(), fast_retry(2)).unwrap();
        let url = serve_status("503 Service Unavailable").await;

        let (result, attempts) = count_attempts(&client, &url).await;

        assert!(result.is_err());
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let client = HttpClient::with_config(TimeoutConfig::global(), fast_retry(2)).unwrap();
        let url = serve_status("404 Not Found").await;

        let (result, attempts) = count_attempts(&client, &url).await;

        let err = result.unwrap_err();
        assert!(!HttpClient::is_retryable_error(&err));
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn test_success_returns_value() {
        let client = HttpClient::with_config(TimeoutConfig::global(), fast_retry(3)).unwrap();
        let value = client
            .execute_with_retry("ok", || async { Ok::<_, anyhow::Error>(42) })
            .await
            .unwrap();
        assert_eq!(value, 42);
    }
}
