// Std library crates
use std::collections::HashSet;
use std::convert::TryFrom;
use std::error::Error;
use std::fmt;

// External crates
use anyhow::{Result, bail};
use binance_sdk::config::ConfigurationRestApi;
use binance_sdk::spot::{
    SpotRestApi,
    rest_api::{KlinesIntervalEnum, KlinesItemInner, KlinesParams, RestApi},
};
use binance_sdk::{errors, errors::ConnectorError as connection_error};

// Local crates
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::binance::{BINANCE, BinanceApiConfig};
use crate::domain::TickerRequest;
use crate::models::DailySeries;
use crate::utils::TimeUtils;
use crate::utils::time_utils::{date_to_epoch_ms, epoch_ms_to_date};

pub fn try_interval_from_ms(ms: i64) -> Result<KlinesIntervalEnum, BNKlineError> {
    match ms {
        TimeUtils::MS_IN_D => Ok(KlinesIntervalEnum::Interval1d),
        TimeUtils::MS_IN_3_D => Ok(KlinesIntervalEnum::Interval3d),
        TimeUtils::MS_IN_W => Ok(KlinesIntervalEnum::Interval1w),
        TimeUtils::MS_IN_1_M => Ok(KlinesIntervalEnum::Interval1M),
        _ => Err(BNKlineError::UnsupportedInterval(ms)),
    }
}

#[derive(Debug, PartialEq)]
pub struct BNKline {
    pub open_timestamp_ms: i64, // only necessary field. All others are optional
    pub open_price: Option<f64>,
    pub high_price: Option<f64>,
    pub low_price: Option<f64>,
    pub close_price: Option<f64>,
    pub base_asset_volume: Option<f64>,
}

// Custom error type for BNKline for better error messages.
#[derive(Debug)]
pub enum BNKlineError {
    InvalidLength,
    InvalidType(String),
    UnsupportedInterval(i64),
    ConnectionFailed(String),
}

impl fmt::Display for BNKlineError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BNKlineError::InvalidLength => write!(f, "Invalid length"),
            BNKlineError::InvalidType(string) => write!(f, "Invalid type: {}", string),
            BNKlineError::UnsupportedInterval(ms) => {
                write!(f, "Unsupported Binance interval: {}ms", ms)
            }
            BNKlineError::ConnectionFailed(msg) => {
                write!(f, "Binance API connection failed: {}.", msg)
            }
        }
    }
}

impl Error for BNKlineError {}

// Binance sends prices as strings; anything else (or an unparsable string) becomes None
fn kline_item_to_float(kline: Option<KlinesItemInner>) -> Option<f64> {
    kline.and_then(|inner| {
        if let KlinesItemInner::String(s) = inner {
            s.parse::<f64>().ok()
        } else {
            None
        }
    })
}

impl TryFrom<Vec<KlinesItemInner>> for BNKline {
    type Error = BNKlineError;

    fn try_from(vec_inner_klines: Vec<KlinesItemInner>) -> Result<Self, Self::Error> {
        let mut items = vec_inner_klines.into_iter();
        let open_timestamp_ms = match items.next().ok_or(BNKlineError::InvalidLength)? {
            KlinesItemInner::Integer(a) => a,
            _ => return Err(BNKlineError::InvalidType("open_time".to_string())),
        };

        let open_price = kline_item_to_float(items.next());
        let high_price = kline_item_to_float(items.next());
        let low_price = kline_item_to_float(items.next());
        let close_price = kline_item_to_float(items.next());
        let volume = kline_item_to_float(items.next());

        Ok(BNKline {
            open_timestamp_ms,
            open_price,
            high_price,
            low_price,
            close_price,
            base_asset_volume: volume,
        })
    }
}

pub fn convert_klines(data: Vec<Vec<KlinesItemInner>>) -> Result<Vec<BNKline>, BNKlineError> {
    data.into_iter().map(Vec::try_into).collect()
}

/// Columnise klines. Klines without a close are skipped; missing open/high/low fall back to close.
pub fn daily_series_from_klines(symbol: &str, klines: &[BNKline]) -> Result<DailySeries> {
    if has_duplicate_kline_open_time(klines) {
        bail!("{}: Binance returned duplicate kline open times", symbol);
    }

    let mut series = DailySeries::new(symbol);
    for kline in klines {
        let Some(close) = kline.close_price else {
            log::warn!(
                "{}: skipping kline at {}ms with no close price",
                symbol,
                kline.open_timestamp_ms
            );
            continue;
        };
        let Some(date) = epoch_ms_to_date(kline.open_timestamp_ms) else {
            continue;
        };
        series.push_bar(
            date,
            kline.open_price.unwrap_or(close),
            kline.high_price.unwrap_or(close),
            kline.low_price.unwrap_or(close),
            close,
            kline.base_asset_volume.unwrap_or(0.0),
        );
    }
    Ok(series)
}

fn configure_binance_client() -> Result<RestApi, anyhow::Error> {
    let config = BinanceApiConfig::default();
    let rest_conf = ConfigurationRestApi::builder()
        .timeout(config.timeout_ms)
        .retries(config.retries)
        .backoff(config.backoff_ms)
        .build()?;
    // Create the Spot REST API client
    let rest_client = SpotRestApi::production(rest_conf);
    Ok(rest_client)
}

async fn fetch_binance_klines(
    rest_client: &RestApi,
    params: KlinesParams,
    request: &TickerRequest,
) -> Result<Vec<Vec<KlinesItemInner>>, anyhow::Error> {
    match rest_client.klines(params).await {
        Ok(response) => Ok(response.data().await?),
        Err(e) => {
            if let Some(conn_err) = e.downcast_ref::<errors::ConnectorError>() {
                match conn_err {
                    connection_error::ConnectorClientError(msg) => {
                        log::error!(
                            "{} Client error: Check your request parameters. {}",
                            request,
                            msg
                        );
                    }
                    connection_error::TooManyRequestsError(msg) => {
                        log::error!(
                            "{} Rate limit exceeded. Please wait and try again. {}",
                            request,
                            msg
                        );
                    }
                    connection_error::RateLimitBanError(msg) => {
                        log::error!(
                            "{} IP address banned due to excessive rate limits. {}",
                            request,
                            msg
                        );
                    }
                    errors::ConnectorError::ServerError { msg, status_code } => {
                        log::error!(
                            "{} Server error: {} (status code: {:?})",
                            request,
                            msg,
                            status_code
                        );
                    }
                    errors::ConnectorError::NetworkError(msg) => {
                        log::error!(
                            "{} Network error: Check your internet connection. {}",
                            request,
                            msg
                        );
                    }
                    connection_error::BadRequestError(msg) => {
                        log::error!(
                            "{} Bad request: is {} a Binance spot symbol? {}",
                            request,
                            request.symbol(),
                            msg
                        );
                    }
                    other => {
                        log::error!("Unexpected ConnectionError variant: {:?}", other);
                    }
                }
                Err(
                    anyhow::Error::new(BNKlineError::ConnectionFailed(conn_err.to_string()))
                        .context(format!("Binance API call failed for {}", request)),
                )
            } else {
                Err(
                    anyhow::Error::new(BNKlineError::ConnectionFailed(e.to_string())).context(
                        format!("Unexpected error during API call for {}", request),
                    ),
                )
            }
        }
    }
}

/// Page forward from `request.start` until `request.end` (exclusive) or a short page.
pub async fn load_klines(request: &TickerRequest) -> Result<Vec<BNKline>, anyhow::Error> {
    let rest_client = configure_binance_client()?;
    let limit = BINANCE.limits.klines_limit;

    let mut start_time = date_to_epoch_ms(request.start);
    let end_time = date_to_epoch_ms(request.end) - 1;
    let mut all_klines: Vec<BNKline> = Vec::new();

    for _page in 0..BINANCE.limits.max_pages {
        let params = KlinesParams::builder(
            request.symbol().to_string(),
            try_interval_from_ms(request.interval_ms)?,
        )
        .limit(limit)
        .start_time(Some(start_time))
        .end_time(Some(end_time))
        .build()?;

        let new_klines = fetch_binance_klines(&rest_client, params, request).await?;
        let batch = convert_klines(new_klines).map_err(|e| {
            anyhow::Error::new(e).context(format!("{} convert_klines failed", request))
        })?;

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_binance_pages {
            log::info!("{}: page {} returned {} klines", request, _page, batch.len());
        }

        let Some(last) = batch.last() else {
            break;
        };
        let next_start = last.open_timestamp_ms + request.interval_ms;
        let short_page = batch.len() < limit as usize;
        all_klines.extend(batch);

        if short_page || next_start > end_time {
            break;
        }
        start_time = next_start;
    }

    Ok(all_klines)
}

fn has_duplicate_kline_open_time(klines: &[BNKline]) -> bool {
    // Checks whether kline.open_time is duplicated anywhere in the `klines` slice
    let mut seen_ids = HashSet::new();
    klines
        .iter()
        .any(|kline| !seen_ids.insert(kline.open_timestamp_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw_kline(open_ms: i64, close: &str) -> Vec<KlinesItemInner> {
        vec![
            KlinesItemInner::Integer(open_ms),
            KlinesItemInner::String("100.0".to_string()),
            KlinesItemInner::String("110.5".to_string()),
            KlinesItemInner::String("95.25".to_string()),
            KlinesItemInner::String(close.to_string()),
            KlinesItemInner::String("1234.5".to_string()),
            KlinesItemInner::Integer(open_ms + TimeUtils::MS_IN_D - 1),
            KlinesItemInner::String("0".to_string()),
            KlinesItemInner::Integer(42),
            KlinesItemInner::String("0".to_string()),
            KlinesItemInner::String("0".to_string()),
            KlinesItemInner::String("0".to_string()),
        ]
    }

    fn day_ms(day: u32) -> i64 {
        date_to_epoch_ms(NaiveDate::from_ymd_opt(2022, 3, day).unwrap())
    }

    #[test]
    fn converts_raw_klines() {
        let klines = convert_klines(vec![raw_kline(day_ms(1), "105.0")]).unwrap();
        assert_eq!(
            klines[0],
            BNKline {
                open_timestamp_ms: day_ms(1),
                open_price: Some(100.0),
                high_price: Some(110.5),
                low_price: Some(95.25),
                close_price: Some(105.0),
                base_asset_volume: Some(1234.5),
            }
        );
    }

    #[test]
    fn unparsable_price_becomes_none() {
        let klines = convert_klines(vec![raw_kline(day_ms(1), "n/a")]).unwrap();
        assert_eq!(klines[0].close_price, None);
    }

    #[test]
    fn open_time_must_be_an_integer() {
        let mut raw = raw_kline(day_ms(1), "1.0");
        raw[0] = KlinesItemInner::String("soon".to_string());
        assert!(matches!(
            BNKline::try_from(raw),
            Err(BNKlineError::InvalidType(_))
        ));
        assert!(matches!(
            BNKline::try_from(Vec::new()),
            Err(BNKlineError::InvalidLength)
        ));
    }

    #[test]
    fn builds_daily_series_and_skips_missing_closes() {
        let klines = convert_klines(vec![
            raw_kline(day_ms(1), "105.0"),
            raw_kline(day_ms(2), "bad"),
            raw_kline(day_ms(3), "107.5"),
        ])
        .unwrap();
        let series = daily_series_from_klines("BTCUSDT", &klines).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.close_prices, vec![105.0, 107.5]);
        assert_eq!(series.dates[1], NaiveDate::from_ymd_opt(2022, 3, 3).unwrap());
        assert!(series.validate().is_ok());
    }

    #[test]
    fn duplicate_open_times_are_rejected() {
        let klines = convert_klines(vec![
            raw_kline(day_ms(1), "105.0"),
            raw_kline(day_ms(1), "106.0"),
        ])
        .unwrap();
        assert!(daily_series_from_klines("BTCUSDT", &klines).is_err());
    }

    #[test]
    fn only_daily_and_longer_intervals() {
        assert!(try_interval_from_ms(TimeUtils::MS_IN_D).is_ok());
        assert!(try_interval_from_ms(TimeUtils::MS_IN_W).is_ok());
        assert!(try_interval_from_ms(TimeUtils::MS_IN_H).is_err());
    }
}
