use crate::config::Config;
use crate::models::ClientScoringConfig;
use reqwest::StatusCode;
use serde_json::json;
use std::fmt;
use std::time::Duration;

/// Failure modes of the scoring config lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeightProviderError {
    /// The config service rejected the credentials (HTTP 401).
    Unauthorized,
    /// Network failure, unexpected status or undecodable body.
    Unavailable(String),
}

impl fmt::Display for WeightProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightProviderError::Unauthorized => write!(f, "unauthorized: invalid API key"),
            WeightProviderError::Unavailable(detail) => {
                write!(f, "config service unavailable: {}", detail)
            }
        }
    }
}

impl std::error::Error for WeightProviderError {}

/// Client for the external config service that publishes per-client weights.
///
/// Weights are fetched on every call; nothing is cached and failed calls
/// are not retried.
#[derive(Clone)]
pub struct ConfigApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ConfigApiClient {
    /// Creates a new `ConfigApiClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the config service, without the `/config` path.
    /// * `timeout` - Upper bound for the whole request, including the body.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, WeightProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                WeightProviderError::Unavailable(format!("Failed to create config client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, WeightProviderError> {
        Self::new(
            config.config_api_url.clone(),
            Duration::from_secs(config.config_api_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves a client identity to its scoring weights.
    ///
    /// # Arguments
    ///
    /// * `identity` - Email or client id the config service knows the client by.
    /// * `api_key` - Credential forwarded as-is.
    ///
    /// # Returns
    ///
    /// * `Result<ClientScoringConfig, WeightProviderError>` - The weights, client id and method tag.
    pub async fn fetch_scoring_config(
        &self,
        identity: &str,
        api_key: &str,
    ) -> Result<ClientScoringConfig, WeightProviderError> {
        let url = format!("{}/config", self.base_url);
        tracing::info!("Fetching scoring config for {} from {}", identity, url);

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "email": identity,
                "api_key": api_key,
            }))
            .send()
            .await
            .map_err(|e| {
                WeightProviderError::Unavailable(format!("Config request failed: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Config service rejected credentials for {}", identity);
            return Err(WeightProviderError::Unauthorized);
        }

        if status != StatusCode::OK {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(WeightProviderError::Unavailable(format!(
                "Config API returned {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let config: ClientScoringConfig = response.json().await.map_err(|e| {
            WeightProviderError::Unavailable(format!("Failed to decode config response: {}", e))
        })?;

        tracing::debug!(
            "Loaded scoring config for client '{}' (method '{}', {} weights)",
            config.client_id,
            config.method,
            config.weights.len()
        );
        Ok(config)
    }
}
