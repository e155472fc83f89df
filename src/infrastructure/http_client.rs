//! HTTP client for scraping and image fetching
//!
//! Thin wrapper around reqwest with a per-request timeout, a custom user
//! agent and status-code checking. The upstream site gets one listing
//! request plus one image request per item each cycle, so there is no rate
//! limiting here.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response};

/// HTTP client configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub follow_redirects: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "shopshot/0.2 (daily shop collage bot)".to_string(),
            timeout_seconds: 30,
            follow_redirects: true,
        }
    }
}

/// HTTP client shared by the listing fetch and all per-item image fetches
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Fetch a URL and fail on non-2xx status
    pub async fn get(&self, url: &str) -> Result<Response> {
        tracing::debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch URL: {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "HTTP request failed with status {}: {}",
                response.status(),
                url
            );
        }

        Ok(response)
    }

    /// Fetch URL and return text content
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from: {url}"))?;

        tracing::debug!("Fetched {} ({} chars)", url, text.len());
        Ok(text)
    }

    /// Fetch URL and return the raw body bytes
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url).await?;
        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from: {url}"))?;

        tracing::debug!("Fetched {} ({} bytes)", url, bytes.len());
        Ok(bytes.to_vec())
    }

    /// Get the configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_http_client_creation() {
        let config = HttpClientConfig::default();
        let client = HttpClient::new(config);
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_user_agent_rejected() {
        let config = HttpClientConfig {
            user_agent: "bad\nagent".to_string(),
            ..Default::default()
        };
        assert!(HttpClient::new(config).is_err());
    }
}
