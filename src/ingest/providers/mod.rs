pub mod pota;
pub mod sota;

use metrics::counter;
use serde::de::DeserializeOwned;

use crate::error::{BotError, Result};
use crate::spot::{Source, Spot};

/// Decodes a feed body that must be a JSON array, normalizing each element
/// on its own. Elements that fail to decode or normalize are logged and
/// skipped; the rest of the batch is kept.
pub(crate) fn parse_batch<R, F>(feed: Source, body: &str, normalize: F) -> Result<Vec<Spot>>
where
    R: DeserializeOwned,
    F: Fn(R) -> Result<Spot>,
{
    let items: Vec<serde_json::Value> = serde_json::from_str(body)
        .map_err(|e| BotError::fetch(feed, format!("payload is not a JSON array: {e}")))?;

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let spot = serde_json::from_value::<R>(item)
            .map_err(|e| BotError::Malformed {
                feed,
                reason: e.to_string(),
            })
            .and_then(&normalize);
        match spot {
            Ok(s) => out.push(s),
            Err(e) => {
                tracing::warn!(error = %e, feed = %feed, "skipping record");
                counter!("malformed_records_total", "feed" => feed.tag()).increment(1);
            }
        }
    }
    Ok(out)
}

/// Shared GET for both feeds: non-2xx and transport errors become `Fetch`.
pub(crate) async fn get_body(client: &reqwest::Client, url: &str, feed: Source) -> Result<String> {
    let rsp = client
        .get(url)
        .send()
        .await
        .map_err(|e| BotError::fetch(feed, format!("http get: {e}")))?;
    let rsp = rsp
        .error_for_status()
        .map_err(|e| BotError::fetch(feed, format!("http status: {e}")))?;
    rsp.text()
        .await
        .map_err(|e| BotError::fetch(feed, format!("http body: {e}")))
}
