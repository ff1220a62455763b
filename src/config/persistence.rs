//! File persistence and serialization configuration

use chrono::NaiveDate;

use crate::utils::TimeUtils;

pub struct PersistenceConfig {
    /// Directory path for storing fetched price history
    pub directory: &'static str,
    /// Base filename for cache files (without extension)
    pub filename_without_ext: &'static str,
    /// Current version of the cache serialization format
    pub version: f64,
    /// Maximum age of a cache file before it is refetched (seconds)
    pub max_age_secs: i64,
    /// Path for saving/loading application UI state
    pub app_state_path: &'static str,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    directory: "price_data",
    filename_without_ext: "daily",
    version: 1.0,
    // 24 hours (60 * 60 * 24)
    max_age_secs: 86_400,
    app_state_path: ".states.json",
};

/// Generate a request-specific cache filename
/// Example: "daily_AMC_1d_2019-09-01_2021-08-29_v1.bin"
pub fn cache_filename(symbol: &str, interval_ms: i64, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{}_{}_{}_{}_{}_v{}.bin",
        PERSISTENCE.filename_without_ext,
        symbol.to_uppercase(),
        TimeUtils::interval_to_string(interval_ms),
        start.format(TimeUtils::STANDARD_TIME_FORMAT),
        end.format(TimeUtils::STANDARD_TIME_FORMAT),
        PERSISTENCE.version
    )
}
