mod decode;
mod types;

pub use decode::{decode_contributors, decode_global_story, decode_user_statistics};
pub use types::StacksContracts;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use tracing::instrument;
use url::Url;

use streakkeeper_domain::shared::{DomainError, Identity};
use streakkeeper_domain::story::{GlobalStory, StoryReader};
use streakkeeper_domain::streak::{StatisticsLookup, UserStatisticsSource};

use crate::clarity::ClarityValue;
use crate::http::HttpClient;
use types::{ReadOnlyRequest, ReadOnlyResponse};

pub const DEFAULT_API_BASE_URL: &str = "https://api.mainnet.hiro.so";

/// Read-only contract client for a Stacks node API
#[derive(Clone)]
pub struct StacksApiClient {
    http: HttpClient,
    api_base: Url,
    contracts: StacksContracts,
}

impl StacksApiClient {
    pub fn new(http: HttpClient, api_base: &str, contracts: StacksContracts) -> Result<Self> {
        let api_base = Url::parse(api_base.trim_end_matches('/'))
            .with_context(|| format!("Invalid Stacks API base URL: {}", api_base))?;

        Ok(Self {
            http,
            api_base,
            contracts,
        })
    }

    pub fn contracts(&self) -> &StacksContracts {
        &self.contracts
    }

    fn call_read_url(&self, contract_name: &str, function: &str) -> String {
        format!(
            "{}/v2/contracts/call-read/{}/{}/{}",
            self.api_base.as_str().trim_end_matches('/'),
            self.contracts.address,
            contract_name,
            function
        )
    }

    /// Call a read-only function and decode its Clarity result
    pub async fn call_read_only(
        &self,
        contract_name: &str,
        function: &str,
        sender: &str,
        arguments: &[ClarityValue],
    ) -> Result<ClarityValue> {
        let url = self.call_read_url(contract_name, function);
        let body = ReadOnlyRequest {
            sender: sender.to_string(),
            arguments: arguments
                .iter()
                .map(ClarityValue::to_hex)
                .collect::<Result<Vec<_>, _>>()?,
        };
        let operation = format!("call-read {}::{}", contract_name, function);

        let response: ReadOnlyResponse = self
            .http
            .execute_with_retry(&operation, || {
                let client = self.http.inner().clone();
                let url = url.clone();
                let body = body.clone();

                async move {
                    let response = client
                        .post(&url)
                        .json(&body)
                        .send()
                        .await
                        .context("Failed to send read-only call")?
                        .error_for_status()?;

                    response
                        .json::<ReadOnlyResponse>()
                        .await
                        .context("Failed to parse read-only call response")
                }
            })
            .await?;

        if !response.okay {
            anyhow::bail!(
                "{} rejected: {}",
                operation,
                response.cause.unwrap_or_else(|| "no cause given".to_string())
            );
        }

        let result = response
            .result
            .ok_or_else(|| anyhow::anyhow!("{} returned no result", operation))?;
        debug!("[ledger] {} result={}", operation, result);

        Ok(ClarityValue::from_hex(&result)?)
    }
}

/// Classify a failed call: protocol-level decoding problems versus transport
fn to_domain_error(error: anyhow::Error) -> DomainError {
    if error.downcast_ref::<crate::clarity::ClarityError>().is_some() {
        DomainError::Deserialization(format!("{:#}", error))
    } else {
        DomainError::Transport(format!("{:#}", error))
    }
}

#[async_trait]
impl UserStatisticsSource for StacksApiClient {
    #[instrument(skip(self), fields(identity = %identity))]
    async fn fetch_user_statistics(
        &self,
        identity: &Identity,
    ) -> Result<StatisticsLookup, DomainError> {
        let principal = ClarityValue::principal(identity.as_str()).map_err(|e| {
            DomainError::Validation(format!("Invalid address {}: {}", identity, e))
        })?;

        let value = self
            .call_read_only(
                &self.contracts.streak_contract,
                "get-user",
                identity.as_str(),
                &[principal],
            )
            .await
            .map_err(to_domain_error)?;

        let lookup = decode_user_statistics(value)?;
        if let StatisticsLookup::Found(stats) = &lookup {
            info!(
                "[ledger] get-user identity={} current={} max={} total={}",
                identity, stats.current_streak, stats.max_streak, stats.total_checkins
            );
        } else {
            info!("[ledger] get-user identity={} not found", identity);
        }

        Ok(lookup)
    }
}

#[async_trait]
impl StoryReader for StacksApiClient {
    async fn fetch_global_story(&self) -> Result<GlobalStory, DomainError> {
        let value = self
            .call_read_only(
                &self.contracts.diary_contract,
                "get-full-story",
                &self.contracts.address,
                &[],
            )
            .await
            .map_err(to_domain_error)?;

        decode_global_story(value)
    }

    async fn fetch_contributors(&self) -> Result<Vec<Identity>, DomainError> {
        let value = self
            .call_read_only(
                &self.contracts.diary_contract,
                "get-contributors",
                &self.contracts.address,
                &[],
            )
            .await
            .map_err(to_domain_error)?;

        let contributors = decode_contributors(value)?;
        if contributors.is_empty() {
            warn!("[ledger] get-contributors returned an empty list");
        }
        Ok(contributors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clarity::ClarityError;

    fn client(base: &str) -> StacksApiClient {
        StacksApiClient::new(HttpClient::new().unwrap(), base, StacksContracts::default()).unwrap()
    }

    #[test]
    fn test_call_read_url() {
        let client = client("https://api.mainnet.hiro.so/");
        assert_eq!(
            client.call_read_url("teeboo-streak", "get-user"),
            "https://api.mainnet.hiro.so/v2/contracts/call-read/SPHMWZQ1KW03KHYPADC81Q6XXS284S7QCHRAS3A8/teeboo-streak/get-user"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result =
            StacksApiClient::new(HttpClient::new().unwrap(), "not a url", StacksContracts::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_clarity_errors_map_to_deserialization() {
        let err = to_domain_error(anyhow::Error::new(ClarityError::TrailingBytes(2)));
        assert!(matches!(err, DomainError::Deserialization(_)));

        let err = to_domain_error(anyhow::anyhow!("connection reset"));
        assert!(matches!(err, DomainError::Transport(_)));
    }

    #[tokio::test]
    async fn test_invalid_identity_fails_before_any_request() {
        let client = client(DEFAULT_API_BASE_URL);
        let result = client
            .fetch_user_statistics(&Identity::from_string("SP2J6EF482VRV4K497Z538TNC2EAJPJ4F81963F01"))
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
