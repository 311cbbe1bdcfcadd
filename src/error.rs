// src/error.rs
use thiserror::Error;

use crate::spot::Source;

/// Failure classes of the bot. None of them stops the poll loop or the
/// lookup path; only `Config` is fatal, and only at startup.
#[derive(Debug, Error)]
pub enum BotError {
    /// A feed was unreachable or returned a payload we could not read.
    #[error("{feed} feed fetch failed: {reason}")]
    Fetch { feed: Source, reason: String },

    /// A single feed record could not be normalized.
    #[error("malformed {feed} record: {reason}")]
    Malformed { feed: Source, reason: String },

    /// A message could not be delivered to a channel.
    #[error("delivery to channel {channel} failed: {reason}")]
    SinkDelivery { channel: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BotError>;

impl BotError {
    pub fn fetch(feed: Source, reason: impl ToString) -> Self {
        Self::Fetch {
            feed,
            reason: reason.to_string(),
        }
    }

    pub fn sink(channel: &str, reason: impl ToString) -> Self {
        Self::SinkDelivery {
            channel: channel.to_string(),
            reason: reason.to_string(),
        }
    }
}
