// src/ingest/mod.rs
pub mod peaks;
pub mod providers;
pub mod roster;
pub mod types;

use std::collections::HashSet;

use metrics::{counter, describe_counter, describe_gauge};
use once_cell::sync::OnceCell;

use crate::ingest::types::SpotProvider;
use crate::spot::{normalize_identity, Spot};

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("spots_fetched_total", "Spots normalized per feed.");
        describe_counter!("feed_errors_total", "Feed fetch/parse failures.");
        describe_counter!(
            "malformed_records_total",
            "Feed records skipped because they could not be normalized."
        );
        describe_counter!(
            "notifications_sent_total",
            "Spot notifications handed to the sink."
        );
        describe_counter!(
            "notifications_throttled_total",
            "Spot notifications suppressed by the activation throttle."
        );
        describe_counter!(
            "park_crossposts_total",
            "Summit spots also announced in the parks channel."
        );
        describe_counter!("sink_errors_total", "Failed message deliveries.");
        describe_counter!("lookups_total", "Callsign lookups answered.");
        describe_gauge!("poll_last_run_ts", "Unix ts when the poll cycle last ran.");
    });
}

/// Both spot feeds. Parks first, summits second; lookups rely on that order.
pub struct Feeds {
    pub pota: Box<dyn SpotProvider>,
    pub sota: Box<dyn SpotProvider>,
}

/// Per-feed result of one fetch round. A failed feed is just empty.
#[derive(Debug, Default)]
pub struct FetchRound {
    pub pota: Vec<Spot>,
    pub sota: Vec<Spot>,
    pub failed_feeds: usize,
}

impl Feeds {
    pub fn new(pota: Box<dyn SpotProvider>, sota: Box<dyn SpotProvider>) -> Self {
        Self { pota, sota }
    }

    /// Fetches both feeds concurrently; one failing does not affect the other.
    pub async fn fetch_all(&self) -> FetchRound {
        let (pota, sota) = tokio::join!(
            fetch_isolated(self.pota.as_ref()),
            fetch_isolated(self.sota.as_ref())
        );
        let failed_feeds = pota.is_none() as usize + sota.is_none() as usize;
        FetchRound {
            pota: pota.unwrap_or_default(),
            sota: sota.unwrap_or_default(),
            failed_feeds,
        }
    }
}

async fn fetch_isolated(p: &dyn SpotProvider) -> Option<Vec<Spot>> {
    match p.fetch_latest().await {
        Ok(v) => {
            tracing::info!(feed = %p.source(), spots = v.len(), "fetched spots");
            Some(v)
        }
        Err(e) => {
            tracing::warn!(error = %e, feed = %p.source(), "feed error");
            counter!("feed_errors_total", "feed" => p.source().tag()).increment(1);
            None
        }
    }
}

pub fn on_roster(spot: &Spot, roster: &HashSet<String>) -> bool {
    roster.contains(&normalize_identity(&spot.identity))
}

/// Spots whose callsign matches `identity`, ignoring case.
pub fn spots_for<'a>(spots: &'a [Spot], identity: &'a str) -> impl Iterator<Item = &'a Spot> + 'a {
    spots
        .iter()
        .filter(move |s| s.identity.trim().eq_ignore_ascii_case(identity.trim()))
}
