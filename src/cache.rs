//! cache.rs — per-callsign list of recently posted spots, used to answer
//! lookups without hitting the feeds again.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::spot::{normalize_identity, Spot};

/// Spots kept per callsign.
pub const MAX_SPOTS_PER_IDENTITY: usize = 10;

/// Newest first, unique by `Spot::id`, at most `cap` entries per callsign.
/// Nothing expires by age; older entries only fall off the end.
#[derive(Debug)]
pub struct SpotCache {
    inner: RwLock<HashMap<String, Vec<Spot>>>,
    cap: usize,
}

impl Default for SpotCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SpotCache {
    pub fn new() -> Self {
        Self::with_capacity(MAX_SPOTS_PER_IDENTITY)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            cap: cap.max(1),
        }
    }

    /// Prepends `spot` unless a spot with the same id is already cached for
    /// this callsign. Returns whether the cache changed.
    pub fn record(&self, identity: &str, spot: &Spot) -> bool {
        let identity = normalize_identity(identity);
        let mut map = self.inner.write().expect("spot cache lock poisoned");
        let spots = map.entry(identity).or_default();

        if spots.iter().any(|s| s.id == spot.id) {
            return false;
        }
        spots.insert(0, spot.clone());
        spots.truncate(self.cap);
        true
    }

    /// Owned copy of the cached spots for `identity`, newest first.
    pub fn lookup(&self, identity: &str) -> Vec<Spot> {
        let identity = normalize_identity(identity);
        let map = self.inner.read().expect("spot cache lock poisoned");
        map.get(&identity).cloned().unwrap_or_default()
    }

    pub fn identities(&self) -> usize {
        self.inner.read().expect("spot cache lock poisoned").len()
    }
}
