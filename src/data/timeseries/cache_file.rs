use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{PERSISTENCE, cache_filename};
use crate::domain::TickerRequest;
use crate::models::DailySeries;

/// Serialized price history for one request, plus enough metadata to decide whether it is stale.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CacheFile {
    pub version: f64,
    pub timestamp_ms: i64,
    pub request: TickerRequest,
    /// Signature of the provider the data originally came from
    pub source: String,
    pub data: DailySeries,
}

impl CacheFile {
    pub fn new(request: TickerRequest, source: &str, data: DailySeries, version: f64) -> Self {
        Self {
            version,
            timestamp_ms: Utc::now().timestamp_millis(),
            request,
            source: source.to_string(),
            data,
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open cache file: {:?}", path))?;
        let mut reader = BufReader::new(file);
        let cache = bincode::deserialize_from(&mut reader)
            .context(format!("Failed to deserialize cache: {:?}", path))?;
        Ok(cache)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        let file =
            File::create(path).context(format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)
            .context(format!("Failed to serialize cache to: {}", path.display()))
    }

    pub fn default_cache_path(request: &TickerRequest) -> PathBuf {
        PathBuf::from(PERSISTENCE.directory).join(cache_filename(
            request.symbol(),
            request.interval_ms,
            request.start,
            request.end,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TimeUtils;
    use chrono::NaiveDate;

    #[test]
    fn round_trips_through_disk() {
        let start = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
        let request = TickerRequest::new(
            "AMC",
            start,
            NaiveDate::from_ymd_opt(2021, 2, 1).unwrap(),
            TimeUtils::MS_IN_D,
        )
        .unwrap();
        let mut data = DailySeries::new("AMC");
        data.push_bar(start, 2.2, 2.3, 2.1, 2.2, 1_000_000.0);
        data.push_bar(start.succ_opt().unwrap(), 2.2, 2.5, 2.2, 2.4, 1_200_000.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.bin");
        let cache = CacheFile::new(request.clone(), "Yahoo Finance", data.clone(), 1.0);
        cache.save_to_path(&path).unwrap();

        let loaded = CacheFile::load_from_path(&path).unwrap();
        assert_eq!(loaded.request, request);
        assert_eq!(loaded.source, "Yahoo Finance");
        assert_eq!(loaded.data, data);
        assert_eq!(loaded.timestamp_ms, cache.timestamp_ms);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CacheFile::load_from_path(&dir.path().join("nope.bin")).is_err());
    }

    #[test]
    fn default_path_names_the_request() {
        let request = TickerRequest::new(
            "amc",
            NaiveDate::from_ymd_opt(2019, 9, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 8, 29).unwrap(),
            TimeUtils::MS_IN_D,
        )
        .unwrap();
        let path = CacheFile::default_cache_path(&request);
        assert!(path.starts_with(PERSISTENCE.directory));
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "daily_AMC_1d_2019-09-01_2021-08-29_v1.bin"
        );
    }
}
