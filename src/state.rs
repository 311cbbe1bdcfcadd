// src/state.rs
use std::sync::Arc;

use crate::cache::SpotCache;
use crate::ingest::peaks::PeakParkMap;
use crate::ingest::roster::RosterHandle;
use crate::ingest::Feeds;
use crate::notify::{Channels, RateLimiter, Sink};

/// Everything the poll loop, the lookup path and the HTTP surface share.
/// The throttle ledger and the cache are only touched through their own
/// methods; each guards itself.
#[derive(Clone)]
pub struct BotState {
    pub feeds: Arc<Feeds>,
    pub limiter: Arc<RateLimiter>,
    pub cache: Arc<SpotCache>,
    pub sink: Arc<dyn Sink>,
    pub roster: RosterHandle,
    pub peaks: Arc<PeakParkMap>,
    pub channels: Channels,
    /// Our own Discord user id: used to spot mentions and ignore our own posts.
    pub bot_user_id: String,
}
