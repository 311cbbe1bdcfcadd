//! Spot bot — Binary Entrypoint
//! Loads config and roster, starts the poll loop and the roster refresher,
//! and serves health, inbound message events and metrics over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spotbot::cache::SpotCache;
use spotbot::config::BotConfig;
use spotbot::ingest::peaks::PeakParkMap;
use spotbot::ingest::providers::{pota::PotaProvider, sota::SotaProvider};
use spotbot::ingest::roster::{spawn_roster_refresh, RosterHandle, RosterLoader};
use spotbot::ingest::Feeds;
use spotbot::metrics::Metrics;
use spotbot::notify::{DiscordSink, RateLimiter};
use spotbot::{buildinfo, poll, BotState};

#[derive(Parser)]
#[command(name = "spotbot")]
#[command(about = "Posts POTA/SOTA activations of tracked callsigns to Discord")]
#[command(disable_version_flag = true)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "SPOTBOT_CONFIG_PATH", default_value = spotbot::config::bot::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Display application build information and exit
    #[arg(long)]
    version: bool,
}

/// Compact logs by default, JSON lines with LOG_FORMAT=json.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spotbot=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    if args.version {
        println!("{}", buildinfo::render());
        return Ok(());
    }

    init_tracing();

    let cfg = BotConfig::load_from_file(&args.config)?;
    tracing::info!(
        config = %args.config.display(),
        interval_secs = cfg.poll.interval_secs,
        throttle_secs = cfg.poll.throttle_secs,
        "config loaded"
    );

    let client = reqwest::Client::new();

    // --- Roster ---
    let roster = RosterHandle::default();
    let loader = Arc::new(RosterLoader::new(cfg.roster_source(), client.clone())?);
    loader.refresh(&roster).await;
    if roster.is_empty() {
        bail!("no callsigns loaded; check roster.file / roster.csv_url");
    }
    if loader.has_url() {
        spawn_roster_refresh(loader.clone(), roster.clone(), cfg.roster_refresh_interval());
    }

    let peaks = match &cfg.poll.peak_map_path {
        Some(p) => PeakParkMap::load_from_path(p),
        None => PeakParkMap::empty(),
    };

    let sink = DiscordSink::new(cfg.discord.token.clone())
        .with_api_base(cfg.discord.api_base.clone())
        .with_client(client.clone());

    let state = BotState {
        feeds: Arc::new(Feeds::new(
            Box::new(PotaProvider::from_url(cfg.feeds.pota_url.clone(), client.clone())),
            Box::new(SotaProvider::from_url(cfg.feeds.sota_url.clone(), client)),
        )),
        limiter: Arc::new(RateLimiter::new(
            i64::try_from(cfg.poll.throttle_secs).context("throttle_secs too large")?,
        )),
        cache: Arc::new(SpotCache::new()),
        sink: Arc::new(sink),
        roster,
        peaks: Arc::new(peaks),
        channels: cfg.channels(),
        bot_user_id: cfg.discord.bot_user_id.clone(),
    };

    let metrics = Metrics::init()?;
    poll::spawn_poll_loop(state.clone(), cfg.poll_interval());

    let app = spotbot::create_router(state).merge(metrics.router());
    let listener = tokio::net::TcpListener::bind(&cfg.server.bind)
        .await
        .with_context(|| format!("binding {}", cfg.server.bind))?;
    tracing::info!(bind = %cfg.server.bind, "bot running");
    axum::serve(listener, app).await.context("http server")?;
    Ok(())
}
