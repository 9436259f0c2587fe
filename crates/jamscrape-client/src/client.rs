use std::path::Path;
use std::time::Duration;

use reqwest::Client;

use jamscrape_core::error::AppError;
use jamscrape_core::models::{DownloadEntry, EntriesFeed, GameDetail, JamMetadata};
use jamscrape_core::pacer::Pacer;
use jamscrape_core::traits::JamClient;

use crate::game_page;
use crate::jam_page;
use crate::urls;

/// Network configuration for the itch.io client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Identifying string sent with every request.
    pub user_agent: String,
    /// Global inter-request delay.
    pub request_delay: Duration,
    /// Per-request network timeout.
    pub timeout: Duration,
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "jamscrape/0.2 (https://github.com/jamscrape/jamscrape)".to_string(),
            request_delay: Duration::from_millis(1500),
            timeout: Duration::from_secs(30),
            base_url: "https://itch.io".to_string(),
        }
    }
}

/// HTTP extraction client for itch.io jams.
///
/// One shared `reqwest::Client` serves all concurrent fetches; the pacer
/// serialises them onto a single global inter-request gap. Cloning is
/// cheap and clones share both.
#[derive(Clone)]
pub struct ItchClient {
    http: Client,
    pacer: Pacer,
    base_url: String,
    timeout_secs: u64,
}

impl ItchClient {
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Http(e.to_string()))?;

        Ok(Self {
            http,
            pacer: Pacer::new(config.request_delay),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout.as_secs(),
        })
    }

    fn map_request_error(&self, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            AppError::Network(format!("Connection failed: {e}"))
        } else {
            AppError::Http(e.to_string())
        }
    }

    /// Paced GET returning the response body as text.
    async fn fetch_text(&self, url: &str) -> Result<String, AppError> {
        self.pacer.wait().await;
        tracing::debug!(%url, "Fetching");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(AppError::Http(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Http(format!("Failed to read response body: {e}")))
    }
}

impl JamClient for ItchClient {
    /// Resolve the jam slug straight off the URL; when that fails, fall
    /// back to fetching the page and reading the randomizer link's id.
    async fn resolve_jam_id(&self, url: &str) -> Result<String, AppError> {
        if let Some(slug) = urls::jam_slug_from_url(url) {
            return Ok(slug);
        }

        let html = self.fetch_text(url).await?;
        jam_page::internal_id_from_randomizer(&html)
            .ok_or_else(|| AppError::NotFound(format!("no jam id in {url}")))
    }

    async fn fetch_jam_metadata(&self, jam_id: &str) -> Result<JamMetadata, AppError> {
        let url = urls::jam_page_url(&self.base_url, jam_id);
        let html = self.fetch_text(&url).await?;
        jam_page::parse_jam_metadata(&html, jam_id)
    }

    async fn fetch_entries(&self, internal_id: &str) -> Result<EntriesFeed, AppError> {
        let url = urls::entries_feed_url(&self.base_url, internal_id);
        let body = self.fetch_text(&url).await?;
        let feed: EntriesFeed = serde_json::from_str(&body)?;
        Ok(feed)
    }

    async fn fetch_game_detail(&self, jam_id: &str, game_id: &str) -> Result<GameDetail, AppError> {
        let url = urls::game_rate_url(&self.base_url, jam_id, game_id);
        let html = self.fetch_text(&url).await?;
        game_page::parse_game_detail(&html)
    }

    async fn download_binary(&self, url: &str, dest: &Path) -> Result<(), AppError> {
        self.pacer.wait().await;
        tracing::debug!(%url, dest = %dest.display(), "Downloading");

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Http(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Http(format!("Failed to read download body: {e}")))?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }

    /// Real download URLs sit behind authenticated session state this
    /// client does not hold, so resolution is never attempted.
    async fn resolve_game_download(
        &self,
        _jam_id: &str,
        _game_id: &str,
        entry: &DownloadEntry,
    ) -> Result<String, AppError> {
        Err(AppError::Unsupported(format!(
            "resolving download URL for '{}' requires authentication",
            entry.filename
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_stock_knobs() {
        let config = ClientConfig::default();
        assert_eq!(config.request_delay, Duration::from_millis(1500));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.base_url, "https://itch.io");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ItchClient::new(ClientConfig {
            base_url: "https://itch.io/".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(client.base_url, "https://itch.io");
    }

    #[tokio::test]
    async fn resolve_jam_id_prefers_the_url_slug() {
        let client = ItchClient::new(ClientConfig::default()).unwrap();
        let id = client
            .resolve_jam_id("https://itch.io/jam/brackeys-13")
            .await
            .unwrap();
        assert_eq!(id, "brackeys-13");
    }

    #[tokio::test]
    async fn file_download_resolution_is_unsupported() {
        let client = ItchClient::new(ClientConfig::default()).unwrap();
        let entry = DownloadEntry {
            filename: "game.zip".to_string(),
            ..Default::default()
        };
        let err = client
            .resolve_game_download("jam", "42", &entry)
            .await
            .unwrap_err();
        assert!(err.is_unsupported());
    }
}
