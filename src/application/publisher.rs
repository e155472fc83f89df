//! Chat publishing boundary
//!
//! The pipeline and scheduler never hold a chat session; everything
//! outbound goes through this trait. The concrete Discord implementation
//! lives in the infrastructure layer.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Identifier of a sent message, used to delete the status message later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageId(pub String);

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat platform returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to read attachment {path}: {source}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected response shape: {0}")]
    Response(String),
}

pub type PublishResult<T> = Result<T, PublishError>;

/// Outbound chat operations the bot needs.
///
/// One implementation per chat platform; tests use an in-memory recorder.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Send a plain text message, returning its id.
    async fn send_text(&self, content: &str) -> PublishResult<MessageId>;

    /// Upload a file to the channel.
    async fn send_file(&self, path: &Path) -> PublishResult<MessageId>;

    /// Delete a previously sent message.
    async fn delete_message(&self, id: &MessageId) -> PublishResult<()>;
}
