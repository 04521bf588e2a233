//! Outbound chat channels.

use std::sync::{Mutex, PoisonError};

use reqwest::Client;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::config::{Config, defaults};
use crate::error::{ChannelResult, ClientError};
use crate::formatters::split_message;
use crate::http::check_status;

/// Trait for places notifications and replies are posted to.
#[async_trait::async_trait]
pub trait Channel: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Post one message, already within the channel's size limit.
    async fn send(&self, message: &str) -> ChannelResult<()>;
}

/// Post `text` as consecutive messages of at most `limit` characters.
pub async fn send_split(channel: &dyn Channel, text: &str, limit: usize) -> ChannelResult<()> {
    let chunks = split_message(text, limit);
    tracing::trace!(channel = channel.name(), chunks = chunks.len(), "Sending message");
    for chunk in &chunks {
        channel.send(chunk).await?;
    }
    Ok(())
}

/// Post every message of `messages` through [`send_split`], logging failures.
///
/// Returns how many messages were delivered completely.
pub async fn send_all(channel: &dyn Channel, messages: &[String], limit: usize) -> usize {
    let mut delivered = 0;
    for message in messages {
        match send_split(channel, message, limit).await {
            Ok(()) => delivered += 1,
            Err(e) => tracing::warn!(channel = channel.name(), error = %e, "Delivery failed"),
        }
    }
    delivered
}

/// Writes each message to stdout followed by a blank line.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdioChannel;

#[async_trait::async_trait]
impl Channel for StdioChannel {
    fn name(&self) -> &'static str {
        "stdout"
    }

    async fn send(&self, message: &str) -> ChannelResult<()> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(message.as_bytes()).await?;
        stdout.write_all(b"\n\n").await?;
        stdout.flush().await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Posts `{"content": ...}` to a Discord-compatible webhook.
#[derive(Clone)]
pub struct WebhookChannel {
    client: Client,
    url: String,
}

impl WebhookChannel {
    /// Create a channel for `url` with the timeouts of `config`.
    pub fn new(url: &str, config: &Config) -> anyhow::Result<Self> {
        url::Url::parse(url)?;

        let client = Client::builder()
            .user_agent(defaults::USER_AGENT)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self { client, url: url.to_string() })
    }
}

impl std::fmt::Debug for WebhookChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The webhook URL embeds its token.
        f.debug_struct("WebhookChannel").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Channel for WebhookChannel {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn send(&self, message: &str) -> ChannelResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { content: message })
            .send()
            .await
            .map_err(ClientError::from)?;
        check_status(response).await?;
        Ok(())
    }
}

/// Collects messages in memory.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    sent: Mutex<Vec<String>>,
}

impl MemoryChannel {
    /// Empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait::async_trait]
impl Channel for MemoryChannel {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn send(&self, message: &str) -> ChannelResult<()> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(message.to_string());
        Ok(())
    }
}
