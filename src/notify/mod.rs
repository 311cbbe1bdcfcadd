// src/notify/mod.rs
pub mod discord;
pub mod throttle;

use std::sync::Mutex;

use crate::error::Result;

pub use discord::DiscordSink;
pub use throttle::RateLimiter;

/// Outbound side of the chat platform.
#[async_trait::async_trait]
pub trait Sink: Send + Sync {
    async fn send(&self, channel_id: &str, text: &str) -> Result<()>;
}

/// The two channels spots are posted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channels {
    pub pota: String,
    pub sota: String,
}

impl Channels {
    pub fn contains(&self, channel_id: &str) -> bool {
        self.pota == channel_id || self.sota == channel_id
    }
}

// --- Test helper ---
/// Sink that keeps every `(channel, text)` it was asked to deliver.
/// With `failing` set it still records the attempt, then reports an error.
#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<(String, String)>>,
    pub failing: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(vec![]),
            failing: true,
        }
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count_for(&self, channel_id: &str) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == channel_id)
            .count()
    }
}

#[async_trait::async_trait]
impl Sink for RecordingSink {
    async fn send(&self, channel_id: &str, text: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((channel_id.to_string(), text.to_string()));
        if self.failing {
            return Err(crate::error::BotError::sink(channel_id, "sink offline"));
        }
        Ok(())
    }
}
