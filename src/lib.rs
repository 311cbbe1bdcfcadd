// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod buildinfo;
pub mod cache;
pub mod config;
pub mod error;
pub mod ingest;
pub mod lookup;
pub mod metrics;
pub mod notify;
pub mod poll;
pub mod spot;
pub mod state;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router;
pub use crate::cache::SpotCache;
pub use crate::error::{BotError, Result};
pub use crate::notify::{Channels, RateLimiter, Sink};
pub use crate::spot::{ActivationKey, Source, Spot};
pub use crate::state::BotState;
