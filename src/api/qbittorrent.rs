//! qBittorrent WebUI client
//!
//! Supplies the torrent inventory for interactive mode.
//! API docs: https://github.com/qbittorrent/qBittorrent/wiki/WebUI-API-(qBittorrent-4.1)

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::config::QbitConfig;
use crate::models::TorrentRecord;

/// qBittorrent API error types
#[derive(Error, Debug)]
pub enum QbitError {
    #[error("login failed: invalid username or password")]
    LoginFailed,

    #[error("login refused: this IP is banned after too many failed attempts")]
    Banned,

    #[error("qBittorrent returned HTTP {0}")]
    Status(u16),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("connection failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Source of the full torrent list for a session
pub trait InventoryProvider {
    fn torrents(&self) -> impl Future<Output = Result<Vec<TorrentRecord>, QbitError>> + Send;
}

/// Torrent entry from `/api/v2/torrents/info`
#[derive(Debug, Deserialize)]
struct QbitTorrent {
    hash: String,
    name: String,
    #[serde(default)]
    size: i64,
    #[serde(default)]
    tracker: String,
    #[serde(default)]
    state: String,
}

impl QbitTorrent {
    /// Convert API response to our TorrentRecord model
    fn into_record(self) -> TorrentRecord {
        TorrentRecord {
            hash: self.hash,
            name: self.name,
            // qBittorrent reports -1 while metadata is still unknown
            size_bytes: self.size.max(0) as u64,
            tracker: (!self.tracker.is_empty()).then_some(self.tracker),
            state: self.state,
        }
    }
}

/// qBittorrent WebUI client
pub struct QbitClient {
    base_url: String,
    client: reqwest::Client,
}

impl QbitClient {
    /// Create a client for the configured WebUI
    pub fn new(config: &QbitConfig) -> Self {
        Self::with_base_url(config.base_url())
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .cookie_store(true)
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create a client and authenticate in one step
    pub async fn connect(config: &QbitConfig) -> Result<Self, QbitError> {
        let client = Self::new(config);
        client.login(&config.username, &config.password).await?;
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authenticate; the SID cookie is kept by the client's cookie store
    pub async fn login(&self, username: &str, password: &str) -> Result<(), QbitError> {
        let response = self
            .client
            .post(format!("{}/api/v2/auth/login", self.base_url))
            // WebUI CSRF protection rejects requests without a matching referer
            .header(reqwest::header::REFERER, &self.base_url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                if body.trim() == "Ok." {
                    tracing::debug!(url = %self.base_url, "Logged in to qBittorrent");
                    Ok(())
                } else {
                    Err(QbitError::LoginFailed)
                }
            }
            StatusCode::FORBIDDEN => Err(QbitError::Banned),
            status => Err(QbitError::Status(status.as_u16())),
        }
    }

    /// WebUI application version, e.g. `v4.6.2`
    pub async fn version(&self) -> Result<String, QbitError> {
        let response = self
            .client
            .get(format!("{}/api/v2/app/version", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QbitError::Status(status.as_u16()));
        }
        Ok(response.text().await?.trim().to_string())
    }

    /// All torrents, sorted case-insensitively by name
    pub async fn fetch_torrents(&self) -> Result<Vec<TorrentRecord>, QbitError> {
        let response = self
            .client
            .get(format!("{}/api/v2/torrents/info", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QbitError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let data: Vec<QbitTorrent> = serde_json::from_str(&text)
            .map_err(|e| QbitError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        let mut torrents: Vec<TorrentRecord> =
            data.into_iter().map(QbitTorrent::into_record).collect();
        torrents.sort_by_cached_key(|t| t.name.to_lowercase());

        tracing::info!(count = torrents.len(), "Fetched torrent inventory");
        Ok(torrents)
    }
}

impl InventoryProvider for QbitClient {
    async fn torrents(&self) -> Result<Vec<TorrentRecord>, QbitError> {
        self.fetch_torrents().await
    }
}
