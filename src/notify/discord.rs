// src/notify/discord.rs
use reqwest::Client;
use serde::Serialize;

use super::Sink;
use crate::error::{BotError, Result};

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Posts plain messages through the Discord REST API with a bot token.
/// One attempt per message; failures go back to the caller.
#[derive(Clone)]
pub struct DiscordSink {
    api_base: String,
    token: String,
    client: Client,
}

impl DiscordSink {
    pub fn new(token: String) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token,
            client: Client::new(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn message_url(&self, channel_id: &str) -> String {
        format!("{}/channels/{}/messages", self.api_base, channel_id)
    }
}

#[derive(Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

#[async_trait::async_trait]
impl Sink for DiscordSink {
    async fn send(&self, channel_id: &str, text: &str) -> Result<()> {
        let rsp = self
            .client
            .post(self.message_url(channel_id))
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
            .json(&CreateMessage { content: text })
            .send()
            .await
            .map_err(|e| BotError::sink(channel_id, format!("request failed: {e}")))?;

        if let Err(e) = rsp.error_for_status_ref() {
            return Err(BotError::sink(channel_id, format!("HTTP error: {e}")));
        }
        tracing::debug!(channel = channel_id, "message delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_trailing_slash_is_dropped() {
        let sink = DiscordSink::new("t".into()).with_api_base("http://localhost:9/api/");
        assert_eq!(
            sink.message_url("123"),
            "http://localhost:9/api/channels/123/messages"
        );
    }
}
