// src/poll.rs
//! Poll cycle: fetch both feeds, keep roster callsigns, gate each spot
//! through the activation throttle, post it, remember it for lookups.

use std::time::Duration;

use metrics::{counter, gauge};
use tokio::task::JoinHandle;

use crate::ingest::{ensure_metrics_described, on_roster};
use crate::spot::{Source, Spot};
use crate::state::BotState;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub matched: usize,
    pub dispatched: usize,
    pub throttled: usize,
    pub crossposts: usize,
    pub send_failures: usize,
    pub failed_feeds: usize,
}

/// Runs one cycle. Never fails: feed errors empty that feed, send errors are
/// logged, and throttle/cache bookkeeping stays committed either way.
pub async fn run_cycle(state: &BotState) -> CycleReport {
    ensure_metrics_described();

    let round = state.feeds.fetch_all().await;
    let roster = state.roster.snapshot();

    let mut report = CycleReport {
        fetched: round.pota.len() + round.sota.len(),
        failed_feeds: round.failed_feeds,
        ..Default::default()
    };

    for spot in round
        .pota
        .iter()
        .chain(round.sota.iter())
        .filter(|s| on_roster(s, &roster))
    {
        report.matched += 1;
        notify_spot(state, spot, &mut report).await;
    }

    gauge!("poll_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
    report
}

async fn notify_spot(state: &BotState, spot: &Spot, report: &mut CycleReport) {
    let key = spot.activation_key();
    if !state.limiter.allow(&key) {
        report.throttled += 1;
        counter!("notifications_throttled_total").increment(1);
        tracing::debug!(%key, "throttled");
        return;
    }

    let channel = match spot.source {
        Source::Pota => &state.channels.pota,
        Source::Sota => &state.channels.sota,
    };
    deliver(state, channel, &spot.notification_text(), report).await;
    counter!("notifications_sent_total", "feed" => spot.source.tag()).increment(1);
    state.cache.record(&spot.identity, spot);

    if spot.source == Source::Sota {
        if let Some(park) = state.peaks.get(&spot.reference) {
            let text = spot.park_notice(&park.park_id, &park.park_name);
            deliver(state, &state.channels.pota, &text, report).await;
            report.crossposts += 1;
            counter!("park_crossposts_total").increment(1);
        }
    }
}

async fn deliver(state: &BotState, channel: &str, text: &str, report: &mut CycleReport) {
    report.dispatched += 1;
    if let Err(e) = state.sink.send(channel, text).await {
        report.send_failures += 1;
        counter!("sink_errors_total").increment(1);
        tracing::warn!(error = %e, channel, "message not delivered");
    } else {
        tracing::info!(channel, text, "posted spot");
    }
}

/// Fixed-interval poll loop. The first cycle runs right away.
pub fn spawn_poll_loop(state: BotState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let r = run_cycle(&state).await;
            tracing::info!(
                target: "poll",
                fetched = r.fetched,
                matched = r.matched,
                dispatched = r.dispatched,
                throttled = r.throttled,
                failed_feeds = r.failed_feeds,
                "poll tick"
            );
        }
    })
}
