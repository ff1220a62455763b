use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::Instant;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::YAHOO;
use crate::data::timeseries::PriceSource;
use crate::domain::TickerRequest;
use crate::models::DailySeries;
use crate::utils::TimeUtils;
use crate::utils::time_utils::{date_to_epoch_ms, epoch_sec_to_local_date};

// ============================================================================
// Wire format of /v8/finance/chart
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartBody,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct ChartMeta {
    pub symbol: String,
    /// Seconds east of UTC for the listing exchange
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
    #[serde(default)]
    pub adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

#[derive(Debug)]
pub enum YahooError {
    Api { code: String, description: String },
    NoResult,
    MissingQuote,
    UnsupportedInterval(i64),
}

impl fmt::Display for YahooError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            YahooError::Api { code, description } => {
                write!(f, "Yahoo Finance error {}: {}", code, description)
            }
            YahooError::NoResult => write!(f, "Yahoo Finance returned no chart result"),
            YahooError::MissingQuote => write!(f, "Yahoo Finance chart has no quote block"),
            YahooError::UnsupportedInterval(ms) => {
                write!(f, "Unsupported Yahoo interval: {}ms", ms)
            }
        }
    }
}

impl std::error::Error for YahooError {}

pub fn yahoo_interval(interval_ms: i64) -> Result<&'static str, YahooError> {
    match interval_ms {
        TimeUtils::MS_IN_D => Ok("1d"),
        TimeUtils::MS_IN_W => Ok("1wk"),
        TimeUtils::MS_IN_1_M => Ok("1mo"),
        other => Err(YahooError::UnsupportedInterval(other)),
    }
}

fn value_at(column: &[Option<f64>], idx: usize) -> Option<f64> {
    column.get(idx).copied().flatten()
}

/// Turn one chart response into a daily series.
///
/// Rows without a close are dropped. With `auto_adjust` the adjusted close
/// replaces the close and open/high/low are scaled by the same ratio. A row
/// landing on the same exchange date as its predecessor replaces it.
pub fn daily_series_from_chart(
    response: ChartResponse,
    auto_adjust: bool,
) -> Result<DailySeries, YahooError> {
    if let Some(error) = response.chart.error {
        return Err(YahooError::Api {
            code: error.code,
            description: error.description,
        });
    }
    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or(YahooError::NoResult)?;

    let mut series = DailySeries::new(result.meta.symbol.to_uppercase());
    if result.timestamp.is_empty() {
        // Valid symbol, no trading days in range
        return Ok(series);
    }

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or(YahooError::MissingQuote)?;
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    for (idx, &timestamp) in result.timestamp.iter().enumerate() {
        let Some(close) = value_at(&quote.close, idx) else {
            continue;
        };
        let Some(date) = epoch_sec_to_local_date(timestamp, result.meta.gmtoffset) else {
            continue;
        };

        let ratio = match value_at(&adjclose, idx) {
            Some(adjusted) if auto_adjust && close != 0.0 => adjusted / close,
            _ => 1.0,
        };
        let open = value_at(&quote.open, idx).unwrap_or(close) * ratio;
        let high = value_at(&quote.high, idx).unwrap_or(close) * ratio;
        let low = value_at(&quote.low, idx).unwrap_or(close) * ratio;
        let volume = value_at(&quote.volume, idx).unwrap_or(0.0);

        if series.last_date() == Some(date) {
            series.dates.pop();
            series.open_prices.pop();
            series.high_prices.pop();
            series.low_prices.pop();
            series.close_prices.pop();
            series.volumes.pop();
        }
        series.push_bar(date, open, high, low, close * ratio, volume);
    }

    Ok(series)
}

pub struct YahooVersion;

#[async_trait]
impl PriceSource for YahooVersion {
    fn signature(&self) -> &'static str {
        "Yahoo Finance"
    }

    async fn fetch(&self, request: &TickerRequest) -> Result<DailySeries> {
        let start_time = Instant::now();
        let client = reqwest::Client::builder()
            .user_agent(YAHOO.user_agent)
            .timeout(Duration::from_millis(YAHOO.timeout_ms))
            .build()
            .context("Failed to build Yahoo Finance client")?;

        let url = format!("{}/v8/finance/chart/{}", YAHOO.base_url, request.symbol());
        let period1 = (date_to_epoch_ms(request.start) / 1000).to_string();
        let period2 = (date_to_epoch_ms(request.end) / 1000).to_string();
        let interval = yahoo_interval(request.interval_ms)?;

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_yahoo_requests {
            log::info!("GET {} period1={} period2={}", url, period1, period2);
        }

        let response = client
            .get(&url)
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", interval),
                ("events", "history"),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .await
            .with_context(|| format!("Yahoo Finance request failed for {}", request))?;

        // Unknown symbols come back as 404 with a JSON error body, so parse before checking status
        let status = response.status();
        let body: ChartResponse = response.json().await.with_context(|| {
            format!(
                "Unreadable Yahoo Finance response for {} (HTTP {})",
                request, status
            )
        })?;

        let mut series = daily_series_from_chart(body, YAHOO.auto_adjust)
            .with_context(|| format!("Yahoo Finance returned no usable data for {}", request))?;
        series.retain_range(request.start, request.end);
        series.validate()?;

        log::info!(
            "{}: {} daily rows from Yahoo Finance in {:?}",
            request.symbol(),
            series.len(),
            start_time.elapsed()
        );
        Ok(series)
    }
}
