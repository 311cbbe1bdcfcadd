// src/ingest/providers/pota.rs
use async_trait::async_trait;
use metrics::counter;
use serde::Deserialize;

use super::{get_body, parse_batch};
use crate::error::{BotError, Result};
use crate::ingest::types::SpotProvider;
use crate::spot::{Site, Source, Spot};

pub const DEFAULT_POTA_URL: &str = "https://api.pota.app/spot/";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPotaSpot {
    spot_id: u64,
    activator: String,
    frequency: String,
    reference: String,
    #[serde(default)]
    spot_time: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    comments: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    location_desc: Option<String>,
}

fn normalize(raw: RawPotaSpot) -> Result<Spot> {
    let identity = raw.activator.trim().to_string();
    if identity.is_empty() {
        return Err(BotError::Malformed {
            feed: Source::Pota,
            reason: format!("spot {} has no activator", raw.spot_id),
        });
    }
    let name = raw.name.unwrap_or_default();
    let location_desc = raw.location_desc.unwrap_or_default();
    let reference = raw.reference.trim().to_string();

    Ok(Spot {
        id: format!("POTA-{}", raw.spot_id),
        source: Source::Pota,
        identity,
        timestamp: raw.spot_time.unwrap_or_default(),
        location: format!("{reference} ({name} {location_desc})"),
        reference,
        frequency: format!("{}KHz", raw.frequency.trim()),
        mode: raw.mode.unwrap_or_default(),
        comments: raw.comments.unwrap_or_default(),
        site: Site::Park {
            name,
            location_desc,
        },
    })
}

/// Parses a POTA `/spot/` response body.
pub fn parse_spots(body: &str) -> Result<Vec<Spot>> {
    parse_batch(Source::Pota, body, normalize)
}

pub struct PotaProvider {
    url: String,
    client: reqwest::Client,
}

impl PotaProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self::from_url(DEFAULT_POTA_URL, client)
    }

    pub fn from_url(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl SpotProvider for PotaProvider {
    async fn fetch_latest(&self) -> Result<Vec<Spot>> {
        let body = get_body(&self.client, &self.url, Source::Pota).await?;
        let spots = parse_spots(&body)?;
        counter!("spots_fetched_total", "feed" => "POTA").increment(spots.len() as u64);
        Ok(spots)
    }

    fn source(&self) -> Source {
        Source::Pota
    }
}
