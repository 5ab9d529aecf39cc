//! cross-seed webhook client
//!
//! Asks a running cross-seed daemon to search for matches of one torrent:
//! `POST /api/webhook?apikey=...` with a form body carrying `infoHash` and
//! `includeSingleEpisodes`.

use std::time::Duration;

use thiserror::Error;

use crate::config::CrossSeedConfig;
use crate::dispatch::{Trigger, TriggerRequest, DEFAULT_TRIGGER_TIMEOUT};

/// Trigger error types
#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("cross-seed returned HTTP {0}")]
    Status(u16),

    /// Carries no URL, the query string holds the api key
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
}

/// cross-seed webhook client
pub struct CrossSeedClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl CrossSeedClient {
    /// Create a client from configuration
    pub fn new(config: &CrossSeedConfig) -> Self {
        Self::with_base_url(config.base_url(), config.api_key.clone())
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_TRIGGER_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Webhook endpoint URL (without the api key)
    pub fn webhook_url(&self) -> String {
        format!("{}/api/webhook", self.base_url)
    }
}

impl Trigger for CrossSeedClient {
    async fn trigger(&self, request: &TriggerRequest) -> Result<(), TriggerError> {
        let include = if request.include_single_episodes {
            "true"
        } else {
            "false"
        };

        tracing::debug!(
            info_hash = %request.info_hash,
            include_single_episodes = include,
            "Triggering cross-seed search"
        );

        let response = self
            .client
            .post(self.webhook_url())
            .query(&[("apikey", self.api_key.as_str())])
            .form(&[
                ("infoHash", request.info_hash.as_str()),
                ("includeSingleEpisodes", include),
            ])
            .send()
            .await
            .map_err(|e| TriggerError::Request(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TriggerError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_url() {
        let client = CrossSeedClient::with_base_url("http://127.0.0.1:2468/", "key");
        assert_eq!(client.webhook_url(), "http://127.0.0.1:2468/api/webhook");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TriggerError::Timeout(Duration::from_secs(30)).to_string(),
            "timed out after 30s"
        );
        assert_eq!(
            TriggerError::Status(401).to_string(),
            "cross-seed returned HTTP 401"
        );
    }
}
