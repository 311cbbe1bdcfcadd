// src/lookup.rs
//! On-demand "what has CALLSIGN been up to" replies. Answers from the spot
//! cache, falls back to a live fetch of both feeds, and never consults the
//! throttle.

use metrics::counter;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ingest::spots_for;
use crate::spot::{normalize_identity, Spot};
use crate::state::BotState;

pub const MAX_LOOKUP_SPOTS: usize = 10;

/// A message seen in one of the bot's channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    pub channel_id: String,
    pub author_id: String,
    /// User ids mentioned in the message.
    #[serde(default)]
    pub mentions: Vec<String>,
    pub content: String,
}

fn mention_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"^<@[!&]?\d*>?").unwrap())
}

/// First word that is not a mention, upper-cased.
pub fn extract_identity(content: &str) -> Option<String> {
    content
        .split_whitespace()
        .find(|w| !mention_re().is_match(w))
        .map(normalize_identity)
}

/// The callsign being asked about, if this event is a query addressed to us.
pub fn query_identity(state: &BotState, ev: &MessageEvent) -> Option<String> {
    if ev.author_id == state.bot_user_id {
        return None;
    }
    if !state.channels.contains(&ev.channel_id) {
        return None;
    }
    if !ev.mentions.iter().any(|m| *m == state.bot_user_id) {
        return None;
    }
    extract_identity(&ev.content)
}

/// Cached spots, or a live fetch capped at `MAX_LOOKUP_SPOTS` (parks first,
/// then summits, each in feed order). The live path writes no state.
pub async fn resolve_spots(state: &BotState, identity: &str) -> Vec<Spot> {
    let cached = state.cache.lookup(identity);
    if !cached.is_empty() {
        return cached;
    }

    tracing::debug!(identity, "cache miss, fetching live spots");
    let round = state.feeds.fetch_all().await;
    spots_for(&round.pota, identity)
        .chain(spots_for(&round.sota, identity))
        .take(MAX_LOOKUP_SPOTS)
        .cloned()
        .collect()
}

pub fn format_reply(identity: &str, spots: &[Spot]) -> String {
    if spots.is_empty() {
        return format!("No recent spots found for {identity}.");
    }
    let mut out = format!("Most recent {MAX_LOOKUP_SPOTS} spots for **{identity}**:\n");
    for s in spots {
        out.push_str(&s.lookup_line());
        out.push('\n');
    }
    out
}

pub async fn respond(state: &BotState, identity: &str) -> String {
    let identity = normalize_identity(identity);
    let spots = resolve_spots(state, &identity).await;
    counter!("lookups_total").increment(1);
    format_reply(&identity, &spots)
}

/// Answers a query event in the channel it came from. Returns the reply text
/// when the event was a query; delivery failures are logged only.
pub async fn handle_message(state: &BotState, ev: &MessageEvent) -> Option<String> {
    let identity = query_identity(state, ev)?;
    let reply = respond(state, &identity).await;
    if let Err(e) = state.sink.send(&ev.channel_id, &reply).await {
        counter!("sink_errors_total").increment(1);
        tracing::warn!(error = %e, channel = %ev.channel_id, "lookup reply not delivered");
    }
    Some(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spot::park_spot;

    #[test]
    fn identity_skips_mentions() {
        assert_eq!(extract_identity("<@123> k6pota"), Some("K6POTA".into()));
        assert_eq!(extract_identity("<@!123>   w6sota extra"), Some("W6SOTA".into()));
        assert_eq!(extract_identity("<@123>"), None);
        assert_eq!(extract_identity("   "), None);
    }

    #[test]
    fn reply_templates() {
        assert_eq!(format_reply("N0CALL", &[]), "No recent spots found for N0CALL.");
        let text = format_reply("K6POTA", &[park_spot(1, "K6POTA", "K-1234")]);
        assert_eq!(
            text,
            "Most recent 10 spots for **K6POTA**:\n\
             - **POTA** [2025-06-01T17:00:00] K-1234 (Test Park US-CA) 14074KHz FT8 (POTA-1)\n"
        );
    }
}
