// src/ingest/providers/sota.rs
use async_trait::async_trait;
use metrics::counter;
use serde::Deserialize;

use super::{get_body, parse_batch};
use crate::error::{BotError, Result};
use crate::ingest::types::SpotProvider;
use crate::spot::{Site, Source, Spot};

/// `-1` asks for spots from the last hour.
pub const DEFAULT_SOTA_URL: &str = "https://api2.sota.org.uk/api/spots/-1/all/all";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSotaSpot {
    id: u64,
    activator_callsign: String,
    /// MHz
    frequency: f64,
    summit_code: String,
    #[serde(default)]
    time_stamp: Option<String>,
    #[serde(default)]
    summit_name: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    comments: Option<String>,
    #[serde(default, rename = "AltM")]
    alt_m: Option<i64>,
    #[serde(default, rename = "AltFt")]
    alt_ft: Option<i64>,
}

fn normalize(raw: RawSotaSpot) -> Result<Spot> {
    let identity = raw.activator_callsign.trim().to_string();
    if identity.is_empty() {
        return Err(BotError::Malformed {
            feed: Source::Sota,
            reason: format!("spot {} has no activator", raw.id),
        });
    }
    let name = raw.summit_name.unwrap_or_default();
    let reference = raw.summit_code.trim().to_string();

    Ok(Spot {
        id: format!("SOTA-{}", raw.id),
        source: Source::Sota,
        identity,
        timestamp: raw.time_stamp.unwrap_or_default(),
        location: format!("{reference} ({name})"),
        reference,
        frequency: format!("{:.3}MHz", raw.frequency),
        mode: raw.mode.unwrap_or_default(),
        comments: raw.comments.unwrap_or_default(),
        site: Site::Summit {
            name,
            alt_ft: raw.alt_ft.unwrap_or_default(),
            alt_m: raw.alt_m.unwrap_or_default(),
        },
    })
}

/// Parses a SOTA `/api/spots` response body.
pub fn parse_spots(body: &str) -> Result<Vec<Spot>> {
    parse_batch(Source::Sota, body, normalize)
}

pub struct SotaProvider {
    url: String,
    client: reqwest::Client,
}

impl SotaProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self::from_url(DEFAULT_SOTA_URL, client)
    }

    pub fn from_url(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl SpotProvider for SotaProvider {
    async fn fetch_latest(&self) -> Result<Vec<Spot>> {
        let body = get_body(&self.client, &self.url, Source::Sota).await?;
        let spots = parse_spots(&body)?;
        counter!("spots_fetched_total", "feed" => "SOTA").increment(spots.len() as u64);
        Ok(spots)
    }

    fn source(&self) -> Source {
        Source::Sota
    }
}
