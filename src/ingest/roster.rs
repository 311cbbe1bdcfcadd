// src/ingest/roster.rs
//! Tracked callsigns: loaded from a local list and/or a CSV published at a
//! URL, kept as an immutable snapshot that is swapped on refresh.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use tokio::task::JoinHandle;

use crate::spot::normalize_identity;

pub type RosterSnapshot = Arc<HashSet<String>>;

/// Shared handle to the current roster. Readers get the whole snapshot and
/// never see a half-applied refresh.
#[derive(Clone, Default)]
pub struct RosterHandle {
    inner: Arc<RwLock<RosterSnapshot>>,
}

impl RosterHandle {
    pub fn new<I, S>(callsigns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let handle = Self::default();
        handle.replace(callsigns);
        handle
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        self.inner.read().expect("roster lock poisoned").clone()
    }

    /// Installs a new snapshot; callsigns are upper-cased and deduplicated.
    pub fn replace<I, S>(&self, callsigns: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: HashSet<String> = callsigns
            .into_iter()
            .map(|c| normalize_identity(c.as_ref()))
            .filter(|c| !c.is_empty())
            .collect();
        let n = set.len();
        *self.inner.write().expect("roster lock poisoned") = Arc::new(set);
        n
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

/// One callsign per line; blank lines and `#` / `//` comments are skipped.
pub fn parse_callsign_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with("//"))
        .map(str::to_string)
        .collect()
}

pub fn load_callsigns_from(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading callsigns from {}", path.display()))?;
    Ok(parse_callsign_list(&content))
}

/// First column of a CSV with a header row; empty cells are skipped.
pub fn parse_callsign_csv(content: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut out = Vec::new();
    for rec in reader.records() {
        let rec = rec.context("parsing callsign csv")?;
        if let Some(call) = rec.get(0).map(str::trim).filter(|c| !c.is_empty()) {
            out.push(call.to_string());
        }
    }
    Ok(out)
}

/// Google Sheets `.../edit` links are turned into their CSV export URL.
pub fn export_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };
    let is_sheet = url
        .host_str()
        .is_some_and(|h| h.contains("docs.google.com"));
    if !is_sheet || !url.path().contains("/edit") {
        return raw.to_string();
    }
    let path = url.path().replacen("/edit", "/export", 1);
    url.set_path(&path);
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "format")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.push(("format".into(), "csv".into()));
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.to_string()
}

pub async fn fetch_callsigns(client: &reqwest::Client, raw_url: &str) -> Result<Vec<String>> {
    let url = export_url(raw_url);
    let rsp = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("fetching callsigns from {url}"))?;
    let status = rsp.status();
    if !status.is_success() {
        return Err(anyhow!("callsign list returned status {status}"));
    }
    let body = rsp.text().await.context("reading callsign list body")?;
    parse_callsign_csv(&body)
}

/// Where the roster comes from. Either or both may be set.
#[derive(Debug, Clone, Default)]
pub struct RosterSource {
    pub file: Option<PathBuf>,
    pub csv_url: Option<String>,
}

pub struct RosterLoader {
    source: RosterSource,
    file_callsigns: Vec<String>,
    client: reqwest::Client,
}

impl RosterLoader {
    /// Reads the local list once; a configured but unreadable file is an error.
    pub fn new(source: RosterSource, client: reqwest::Client) -> Result<Self> {
        let file_callsigns = match &source.file {
            Some(p) => {
                let v = load_callsigns_from(p)?;
                tracing::info!(count = v.len(), path = %p.display(), "parsed callsign file");
                v
            }
            None => Vec::new(),
        };
        Ok(Self {
            source,
            file_callsigns,
            client,
        })
    }

    /// Rebuilds the roster from the file list plus the URL list. When the
    /// URL fetch fails the current snapshot is left untouched, unless it is
    /// still empty, in which case the file list is installed on its own.
    pub async fn refresh(&self, handle: &RosterHandle) -> usize {
        let mut combined = self.file_callsigns.clone();
        if let Some(url) = &self.source.csv_url {
            match fetch_callsigns(&self.client, url).await {
                Ok(v) => {
                    tracing::info!(count = v.len(), "fetched callsigns from url");
                    combined.extend(v);
                }
                Err(e) => {
                    tracing::warn!(error = %format!("{e:#}"), "callsign url refresh failed");
                    if !handle.is_empty() {
                        return handle.len();
                    }
                }
            }
        }
        let n = handle.replace(combined);
        tracing::info!(total = n, "roster loaded");
        n
    }

    pub fn has_url(&self) -> bool {
        self.source.csv_url.is_some()
    }
}

/// Periodic URL refresh. The first tick is skipped; the caller has already
/// loaded the roster once at startup.
pub fn spawn_roster_refresh(
    loader: Arc<RosterLoader>,
    handle: RosterHandle,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            tracing::info!("refreshing callsigns");
            loader.refresh(&handle).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_skips_comments_and_blanks() {
        let content = "\n# Comment\nK6POTA\nW6SOTA\n// Another comment\n\n  N6HAM  \n";
        assert_eq!(
            parse_callsign_list(content),
            vec!["K6POTA".to_string(), "W6SOTA".into(), "N6HAM".into()]
        );
    }

    #[test]
    fn csv_takes_first_column_after_header() {
        let body = "Header1,Header2\nK6POTA,Test Park\nW6SOTA,Test Peak\n\n,Empty Call\n";
        assert_eq!(
            parse_callsign_csv(body).unwrap(),
            vec!["K6POTA".to_string(), "W6SOTA".into()]
        );
    }

    #[test]
    fn sheet_edit_link_becomes_export() {
        let out = export_url("https://docs.google.com/spreadsheets/d/abc/edit?gid=0");
        assert_eq!(
            out,
            "https://docs.google.com/spreadsheets/d/abc/export?gid=0&format=csv"
        );
        let plain = "https://example.org/calls.csv";
        assert_eq!(export_url(plain), plain);
    }

    #[test]
    fn handle_normalizes_and_dedups() {
        let h = RosterHandle::new(["k6pota", "K6POTA ", "w6sota", ""]);
        let snap = h.snapshot();
        assert_eq!(snap.len(), 2);
        assert!(snap.contains("K6POTA"));
        assert!(snap.contains("W6SOTA"));
    }

    #[test]
    fn old_snapshot_survives_replace() {
        let h = RosterHandle::new(["A"]);
        let before = h.snapshot();
        h.replace(["B", "C"]);
        assert!(before.contains("A"));
        assert_eq!(before.len(), 1);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn file_loader() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("calls.txt");
        std::fs::write(&p, "# club\nK6POTA\n").unwrap();
        assert_eq!(load_callsigns_from(&p).unwrap(), vec!["K6POTA".to_string()]);
        assert!(load_callsigns_from(&dir.path().join("missing.txt")).is_err());
    }
}
