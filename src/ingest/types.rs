// src/ingest/types.rs
use crate::error::Result;
use crate::spot::{Source, Spot};

/// A spot feed. Implementations return every record they could normalize;
/// an `Err` means the whole feed was unusable for this round.
#[async_trait::async_trait]
pub trait SpotProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Spot>>;
    fn source(&self) -> Source;
}
