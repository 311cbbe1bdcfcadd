// src/spot.rs
//! Canonical spot shape shared by the poll loop, the throttle and the cache.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Parks on the Air.
    Pota,
    /// Summits on the Air.
    Sota,
}

impl Source {
    pub fn tag(self) -> &'static str {
        match self {
            Source::Pota => "POTA",
            Source::Sota => "SOTA",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Where the activation takes place; carries the fields the notification
/// templates need beyond the common ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Site {
    Park {
        name: String,
        location_desc: String,
    },
    Summit {
        name: String,
        alt_ft: i64,
        alt_m: i64,
    },
}

/// One normalized activity event. `id` is source-prefixed (`POTA-123`) and
/// therefore unique across both feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: String,
    pub source: Source,
    pub identity: String,
    pub timestamp: String,
    /// Park reference or summit code.
    pub reference: String,
    /// Human readable location, e.g. `K-1234 (Some Park CA)`.
    pub location: String,
    /// Frequency with unit suffix.
    pub frequency: String,
    pub mode: String,
    pub comments: String,
    pub site: Site,
}

/// Throttle key: "this callsign doing this activation at this place".
/// Coarser than `Spot::id`, so a re-spot with new comments or a slightly
/// different frequency maps onto the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivationKey(String);

impl ActivationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActivationKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Upper-cases and trims a callsign; every identity comparison goes through here.
pub fn normalize_identity(identity: &str) -> String {
    identity.trim().to_ascii_uppercase()
}

impl Spot {
    pub fn activation_key(&self) -> ActivationKey {
        let identity = normalize_identity(&self.identity);
        let key = match &self.site {
            Site::Park {
                name,
                location_desc,
            } => format!("{identity} at {} ({name} {location_desc})", self.reference),
            Site::Summit { name, alt_ft, .. } => {
                format!("{identity} at {} ({name} - {alt_ft}ft)", self.reference)
            }
        };
        ActivationKey(key)
    }

    /// Text posted to the feed's own channel.
    pub fn notification_text(&self) -> String {
        match &self.site {
            Site::Park {
                name,
                location_desc,
            } => format!(
                "{} at {} ({name} {location_desc}) on {} {} [{}]",
                self.identity, self.reference, self.frequency, self.mode, self.comments
            ),
            Site::Summit {
                name,
                alt_ft,
                alt_m,
            } => format!(
                "{} at {} ({name} - {alt_ft}ft/{alt_m}m) on {} {} [{}]",
                self.identity, self.reference, self.frequency, self.mode, self.comments
            ),
        }
    }

    /// Text posted to the parks channel when a summit lies inside a park.
    pub fn park_notice(&self, park_id: &str, park_name: &str) -> String {
        format!(
            "{} at {park_id} ({park_name}) on {} {} [from SOTA spot]",
            self.identity, self.frequency, self.mode
        )
    }

    /// One bullet of a lookup reply.
    pub fn lookup_line(&self) -> String {
        format!(
            "- **{}** [{}] {} {} {} ({})",
            self.source, self.timestamp, self.location, self.frequency, self.mode, self.id
        )
    }
}

#[cfg(test)]
pub(crate) fn park_spot(id: u64, identity: &str, reference: &str) -> Spot {
    Spot {
        id: format!("POTA-{id}"),
        source: Source::Pota,
        identity: identity.to_string(),
        timestamp: "2025-06-01T17:00:00".to_string(),
        reference: reference.to_string(),
        location: format!("{reference} (Test Park US-CA)"),
        frequency: "14074KHz".to_string(),
        mode: "FT8".to_string(),
        comments: "QRT soon".to_string(),
        site: Site::Park {
            name: "Test Park".to_string(),
            location_desc: "US-CA".to_string(),
        },
    }
}
