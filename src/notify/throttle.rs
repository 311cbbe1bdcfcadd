// src/notify/throttle.rs
use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration as ChronoDuration, Utc};

use crate::spot::ActivationKey;

/// Per-activation cooldown gate to prevent re-posting the same activation.
/// - First notification for a key always passes.
/// - Inside the window, notifications for that key are suppressed.
/// - A passing check records `now` in the same critical section.
///
/// Keys are never evicted; the ledger lives as long as the process.
#[derive(Debug)]
pub struct RateLimiter {
    window: ChronoDuration,
    last_allowed: Mutex<HashMap<ActivationKey, DateTime<Utc>>>,
}

impl RateLimiter {
    /// `window_secs` < 0 is treated as 0 (no throttling).
    pub fn new(window_secs: i64) -> Self {
        Self {
            window: ChronoDuration::seconds(window_secs.max(0)),
            last_allowed: Mutex::new(HashMap::new()),
        }
    }

    pub fn allow(&self, key: &ActivationKey) -> bool {
        self.allow_at(key, Utc::now())
    }

    /// Check-and-set at `now`. The read, compare and write happen under one
    /// lock so two callers racing on the same key cannot both pass.
    pub fn allow_at(&self, key: &ActivationKey, now: DateTime<Utc>) -> bool {
        let mut ledger = self.last_allowed.lock().expect("rate limiter mutex poisoned");
        let pass = match ledger.get(key) {
            None => true,
            Some(ts) => now.signed_duration_since(*ts) >= self.window,
        };
        if pass {
            ledger.insert(key.clone(), now);
        }
        pass
    }

    pub fn tracked_keys(&self) -> usize {
        self.last_allowed
            .lock()
            .expect("rate limiter mutex poisoned")
            .len()
    }
}
