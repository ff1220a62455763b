pub mod bn_kline;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::time::Instant;

use crate::data::timeseries::PriceSource;
use crate::domain::TickerRequest;
use crate::models::DailySeries;

#[cfg(debug_assertions)]
use crate::utils::time_utils;

pub struct BNAPIVersion;

#[async_trait]
impl PriceSource for BNAPIVersion {
    fn signature(&self) -> &'static str {
        "Binance API"
    }

    async fn fetch(&self, request: &TickerRequest) -> Result<DailySeries> {
        let start_time = Instant::now();

        let klines = bn_kline::load_klines(request).await?;
        let mut series = bn_kline::daily_series_from_klines(request.symbol(), &klines)
            .with_context(|| format!("Binance returned unusable klines for {}", request))?;
        series.retain_range(request.start, request.end);
        series.validate()?;

        #[cfg(debug_assertions)]
        if let (Some(first), Some(last)) = (klines.first(), klines.last()) {
            log::info!(
                "{} (started on {}, ended on {}) with {} klines",
                request.symbol(),
                time_utils::epoch_ms_to_utc(first.open_timestamp_ms),
                time_utils::epoch_ms_to_utc(last.open_timestamp_ms),
                klines.len(),
            );
        }

        log::info!(
            "{}: {} daily rows from Binance in {:?}",
            request.symbol(),
            series.len(),
            start_time.elapsed()
        );
        Ok(series)
    }
}
