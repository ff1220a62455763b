use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const MS_IN_MIN: i64 = Self::MS_IN_S * 60;
    pub const MS_IN_H: i64 = Self::MS_IN_MIN * 60;
    pub const MS_IN_D: i64 = Self::MS_IN_H * 24;
    pub const MS_IN_3_D: i64 = Self::MS_IN_H * 24 * 3;
    pub const MS_IN_W: i64 = Self::MS_IN_D * 7;
    pub const MS_IN_1_M: i64 = Self::MS_IN_D * 30;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";

    /// Convert interval in milliseconds to a Binance-style shorthand (e.g. `1d`, `1w`).
    pub fn interval_to_string(interval_ms: i64) -> &'static str {
        match interval_ms {
            Self::MS_IN_D => "1d",
            Self::MS_IN_3_D => "3d",
            Self::MS_IN_W => "1w",
            Self::MS_IN_1_M => "1M",
            _ => "unknown",
        }
    }
}

/// Parse a `YYYY-MM-DD` string. Used by the CLI value parser.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), TimeUtils::STANDARD_TIME_FORMAT)
        .with_context(|| format!("'{}' is not a {} date", text, TimeUtils::STANDARD_TIME_FORMAT))
}

/// Midnight UTC of `date`, as epoch milliseconds.
pub fn date_to_epoch_ms(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
}

pub fn epoch_ms_to_date(epoch_ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(epoch_ms).map(|dt| dt.date_naive())
}

/// Calendar date of `epoch_sec` shifted by an exchange offset (seconds east of UTC).
pub fn epoch_sec_to_local_date(epoch_sec: i64, gmt_offset_sec: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(epoch_sec + gmt_offset_sec, 0).map(|dt| dt.date_naive())
}

// Plot x coordinates are whole days since the Unix epoch.
pub fn date_to_plot_x(date: NaiveDate) -> f64 {
    (date - DateTime::UNIX_EPOCH.date_naive()).num_days() as f64
}

pub fn plot_x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    DateTime::UNIX_EPOCH
        .date_naive()
        .checked_add_signed(chrono::Duration::days(x.round() as i64))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(TimeUtils::STANDARD_TIME_FORMAT).to_string()
}

pub fn epoch_ms_to_utc(epoch_ms: i64) -> String {
    // Used for display purposes
    match DateTime::<Utc>::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format(TimeUtils::STANDARD_TIME_FORMAT).to_string(),
        None => String::new(),
    }
}

pub fn local_now_as_timestamp_ms() -> i64 {
    let now_local = Local::now();
    now_local.timestamp_millis()
}

pub fn how_many_seconds_ago(past_timestamp_ms: i64) -> i64 {
    // How many seconds ago was the event described by `past_timestamp_ms` ?
    let now_timestamp_ms = local_now_as_timestamp_ms();
    (now_timestamp_ms - past_timestamp_ms) / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_standard_dates() {
        assert_eq!(parse_date("2019-09-01").unwrap(), date(2019, 9, 1));
        assert_eq!(parse_date(" 2021-08-29 ").unwrap(), date(2021, 8, 29));
        assert!(parse_date("29/08/2021").is_err());
    }

    #[test]
    fn epoch_ms_round_trips_through_dates() {
        let d = date(2020, 2, 29);
        let ms = date_to_epoch_ms(d);
        assert_eq!(ms % TimeUtils::MS_IN_D, 0);
        assert_eq!(epoch_ms_to_date(ms), Some(d));
        assert_eq!(epoch_ms_to_date(ms + TimeUtils::MS_IN_H * 23), Some(d));
        assert_eq!(epoch_ms_to_utc(ms), format_date(d));
        assert_eq!(epoch_ms_to_utc(i64::MAX), "");
    }

    #[test]
    fn exchange_offset_moves_the_calendar_day() {
        // 2021-01-05 02:30 UTC is still 2021-01-04 in New York (UTC-5)
        let ts = date_to_epoch_ms(date(2021, 1, 5)) / 1000 + 2 * 3600 + 1800;
        assert_eq!(epoch_sec_to_local_date(ts, 0), Some(date(2021, 1, 5)));
        assert_eq!(epoch_sec_to_local_date(ts, -5 * 3600), Some(date(2021, 1, 4)));
    }

    #[test]
    fn plot_axis_uses_days_since_epoch() {
        assert_eq!(date_to_plot_x(date(1970, 1, 2)), 1.0);
        let d = date(2021, 8, 27);
        assert_eq!(plot_x_to_date(date_to_plot_x(d)), Some(d));
        assert_eq!(plot_x_to_date(date_to_plot_x(d) + 0.4), Some(d));
        assert_eq!(plot_x_to_date(f64::NAN), None);
    }

    #[test]
    fn interval_names() {
        assert_eq!(TimeUtils::interval_to_string(TimeUtils::MS_IN_D), "1d");
        assert_eq!(TimeUtils::interval_to_string(TimeUtils::MS_IN_W), "1w");
        assert_eq!(TimeUtils::interval_to_string(42), "unknown");
    }
}
