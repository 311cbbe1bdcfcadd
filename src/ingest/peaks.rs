// src/ingest/peaks.rs
//! Summit → park lookup, loaded once from the SOTA summits CSV export that
//! carries a park column.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Columns in the summits export; the park id lives in the last one.
const MIN_FIELDS: usize = 19;
const PARK_NAME_FIELD: usize = 17;
const PARK_ID_FIELD: usize = 18;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkMapping {
    pub park_id: String,
    pub park_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct PeakParkMap {
    inner: HashMap<String, ParkMapping>,
}

impl PeakParkMap {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Missing or unreadable files give an empty map; the bot still runs,
    /// it just never cross-posts summits to the parks channel.
    pub fn load_from_path(path: &Path) -> Self {
        tracing::info!(path = %path.display(), "loading peak to park mapping");
        match std::fs::File::open(path) {
            Ok(f) => {
                let map = Self::from_reader(f);
                tracing::info!(mappings = map.len(), "peak to park mapping loaded");
                map
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot open peak mapping");
                Self::empty()
            }
        }
    }

    /// Header row is skipped; short rows are warned about and skipped; rows
    /// with an empty park id are dropped.
    pub fn from_reader<R: Read>(rdr: R) -> Self {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(rdr);

        let mut inner = HashMap::new();
        for (i, rec) in reader.records().enumerate() {
            // +2: one for the header, one for 1-based lines
            let line = i + 2;
            let rec = match rec {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(line, error = %e, "unreadable peak mapping row");
                    continue;
                }
            };
            if rec.len() < MIN_FIELDS {
                tracing::warn!(line, fields = rec.len(), "skipping short peak mapping row");
                continue;
            }
            let park_id = rec[PARK_ID_FIELD].trim();
            if park_id.is_empty() {
                continue;
            }
            inner.insert(
                rec[0].trim().to_string(),
                ParkMapping {
                    park_id: park_id.to_string(),
                    park_name: rec[PARK_NAME_FIELD].trim().to_string(),
                },
            );
        }
        Self { inner }
    }

    pub fn insert(&mut self, summit_code: impl Into<String>, mapping: ParkMapping) {
        self.inner.insert(summit_code.into(), mapping);
    }

    pub fn get(&self, summit_code: &str) -> Option<&ParkMapping> {
        self.inner.get(summit_code)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMITS_CSV: &str = "SummitCode,AssociationName,RegionName,SummitName,AltM,AltFt,GridRef1,GridRef2,Longitude,Latitude,Points,BonusPoints,ValidFrom,ValidTo,ActivationCount,ActivationDate,ActivationCall,ParkName,Pota
3Y/BV-001,Bouvet Island,Bouvetoya,Olavtoppen,780,2559,3.3565,-54.4104,3.3565,-54.4104,10,3,01/03/2018,31/12/2099,0,,,,
4O/IC-001,Montenegro,Istok Crne Gore,Maja Rosit,2524,8280,19.8505,42.4795,19.8505,42.4795,10,3,01/03/2019,31/12/2099,1,27/07/2022,4O/SQ9MDF/P,,
K0M/NE-001,USA - Minnesota ,Northeast,Eagle Mountain,701,2301,-90.5605,47.8975,-90.5605,47.8975,10,3,01/10/2013,31/12/2099,13,20/06/2023,W9UUM,Superior National Forest/Boundary Waters Canoe Area Wilderness Area,US-4491
K0M/NE-002,USA - Minnesota ,Northeast,2266,691,2266,-90.3710,47.9297,-90.371,47.9297,8,3,01/10/2013,31/12/2099,0,,,Superior National Forest/Pat Bayle State Forest,US-4491/US-4816
K0M/NE-003,USA - Minnesota ,Northeast,Misquah Hills,689,2260,-90.5198,47.9749,-90.5198,47.9749,8,3,01/10/2013,31/12/2099,0,,,Superior National Forest/Boundary Waters Canoe Area Wilderness Area,US-4491
XX/XX-999,USA - Minnesota ,Northeast,Misquah Hills,689,2260,-90.5198,47.9749,-90.5198,47.9749,8,3,01/10/2013,31/12/2099,0,,,Superior National Forest/Boundary Waters Canoe Area Wilderness Area,XX-8888,,
JW/VS-597,Svalbard,Nordvest-Spitsbergen,Kobben,265,869,10.9012,79.6937,10.9012,79.6937,1,0,01/02/2021,31/12/2099
";

    #[test]
    fn keeps_only_rows_with_park_id() {
        let map = PeakParkMap::from_reader(SUMMITS_CSV.as_bytes());
        assert_eq!(map.len(), 4);
        assert!(map.get("3Y/BV-001").is_none());
        assert!(map.get("4O/IC-001").is_none());
        assert_eq!(
            map.get("K0M/NE-003"),
            Some(&ParkMapping {
                park_id: "US-4491".into(),
                park_name:
                    "Superior National Forest/Boundary Waters Canoe Area Wilderness Area".into(),
            })
        );
    }

    #[test]
    fn extra_and_short_rows() {
        let map = PeakParkMap::from_reader(SUMMITS_CSV.as_bytes());
        assert_eq!(map.get("XX/XX-999").unwrap().park_id, "XX-8888");
        assert!(map.get("JW/VS-597").is_none());
    }

    #[test]
    fn missing_file_is_empty() {
        let map = PeakParkMap::load_from_path(Path::new("does/not/exist.csv"));
        assert!(map.is_empty());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("summits.csv");
        std::fs::write(&p, SUMMITS_CSV).unwrap();
        assert_eq!(PeakParkMap::load_from_path(&p).len(), 4);
    }
}
