//! Discord REST publisher
//!
//! Concrete [`Publisher`] over the Discord channel-message REST API. Only
//! the three outbound calls the bot needs: create message, upload file,
//! delete message. The gateway session that receives the on-demand trigger
//! lives outside this crate and calls back through the scheduler module.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::debug;

use crate::application::publisher::{MessageId, PublishError, PublishResult, Publisher};

const API_BASE: &str = "https://discord.com/api/v10";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Publishes to one fixed Discord channel using a bot token.
pub struct DiscordPublisher {
    http: Client,
    token: String,
    channel_id: u64,
    api_base: String,
}

impl DiscordPublisher {
    /// Build a publisher for the given channel. The token is consumed once
    /// here and lives only inside the client afterwards.
    pub fn new(token: String, channel_id: u64) -> PublishResult<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            token,
            channel_id,
            api_base: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn messages_url(&self) -> String {
        format!("{}/channels/{}/messages", self.api_base, self.channel_id)
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    async fn check_status(response: Response) -> PublishResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(PublishError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn message_id(response: Response) -> PublishResult<MessageId> {
        let value: serde_json::Value = response.json().await?;
        value["id"]
            .as_str()
            .map(|id| MessageId(id.to_string()))
            .ok_or_else(|| PublishError::Response("message response without id".to_string()))
    }
}

#[async_trait]
impl Publisher for DiscordPublisher {
    async fn send_text(&self, content: &str) -> PublishResult<MessageId> {
        debug!("Sending text message to channel {}", self.channel_id);

        let response = self
            .http
            .post(self.messages_url())
            .header("Authorization", self.auth_header())
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await?;

        Self::message_id(Self::check_status(response).await?).await
    }

    async fn send_file(&self, path: &Path) -> PublishResult<MessageId> {
        debug!(
            "Uploading {} to channel {}",
            path.display(),
            self.channel_id
        );

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| PublishError::Attachment {
                path: path.display().to_string(),
                source,
            })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "collage.png".to_string());

        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str("image/png")?;
        let form = Form::new().part("files[0]", part);

        let response = self
            .http
            .post(self.messages_url())
            .header("Authorization", self.auth_header())
            .multipart(form)
            .send()
            .await?;

        Self::message_id(Self::check_status(response).await?).await
    }

    async fn delete_message(&self, id: &MessageId) -> PublishResult<()> {
        debug!("Deleting message {} in channel {}", id.0, self.channel_id);

        let url = format!("{}/{}", self.messages_url(), id.0);
        let response = self
            .http
            .delete(url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_channel_message_url() {
        let publisher = DiscordPublisher::new("token".to_string(), 1209539512842326048)
            .unwrap()
            .with_api_base("https://example.test/api");
        assert_eq!(
            publisher.messages_url(),
            "https://example.test/api/channels/1209539512842326048/messages"
        );
    }

    #[test]
    fn auth_header_uses_bot_scheme() {
        let publisher = DiscordPublisher::new("abc123".to_string(), 1).unwrap();
        assert_eq!(publisher.auth_header(), "Bot abc123");
    }
}
