use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::price_point::PricePoint;
use crate::utils::time_utils::format_date;

// ============================================================================
// DailySeries: raw OHLCV history for one ticker, stored column-wise
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DailySeries {
    pub symbol: String,
    pub dates: Vec<NaiveDate>,

    // Prices
    pub open_prices: Vec<f64>,
    pub high_prices: Vec<f64>,
    pub low_prices: Vec<f64>,
    pub close_prices: Vec<f64>,

    // Volume (shares for equities, base asset for crypto pairs)
    pub volumes: Vec<f64>,
}

impl DailySeries {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    pub fn push_bar(&mut self, date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) {
        self.dates.push(date);
        self.open_prices.push(open);
        self.high_prices.push(high);
        self.low_prices.push(low);
        self.close_prices.push(close);
        self.volumes.push(volume);
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Keep only rows with `start <= date < end`.
    pub fn retain_range(&mut self, start: NaiveDate, end: NaiveDate) {
        let keep: Vec<bool> = self.dates.iter().map(|d| *d >= start && *d < end).collect();
        retain_by_mask(&mut self.dates, &keep);
        retain_by_mask(&mut self.open_prices, &keep);
        retain_by_mask(&mut self.high_prices, &keep);
        retain_by_mask(&mut self.low_prices, &keep);
        retain_by_mask(&mut self.close_prices, &keep);
        retain_by_mask(&mut self.volumes, &keep);
    }

    /// Every provider output passes through here before analysis.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            bail!("{}: price history is empty", self.symbol);
        }
        let n = self.dates.len();
        let columns = [
            ("open", self.open_prices.len()),
            ("high", self.high_prices.len()),
            ("low", self.low_prices.len()),
            ("close", self.close_prices.len()),
            ("volume", self.volumes.len()),
        ];
        for (name, len) in columns {
            if len != n {
                bail!("{}: {} column has {} rows, expected {}", self.symbol, name, len, n);
            }
        }
        if let Some(pair) = self.dates.windows(2).find(|pair| pair[0] >= pair[1]) {
            bail!(
                "{}: dates are not strictly increasing ({} followed by {})",
                self.symbol,
                format_date(pair[0]),
                format_date(pair[1])
            );
        }
        if let Some(idx) = self.close_prices.iter().position(|c| !c.is_finite()) {
            bail!(
                "{}: non-finite close on {}",
                self.symbol,
                format_date(self.dates[idx])
            );
        }
        Ok(())
    }

    /// Drop every column except the close.
    pub fn close_points(&self) -> Vec<PricePoint> {
        self.dates
            .iter()
            .zip(&self.close_prices)
            .map(|(&date, &close)| PricePoint::new(date, close))
            .collect()
    }
}

fn retain_by_mask<T>(column: &mut Vec<T>, keep: &[bool]) {
    let mut flags = keep.iter();
    column.retain(|_| *flags.next().unwrap_or(&false));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 6, day).unwrap()
    }

    fn sample() -> DailySeries {
        let mut series = DailySeries::new("AMC");
        series.push_bar(date(1), 10.0, 11.0, 9.5, 10.5, 1000.0);
        series.push_bar(date(2), 10.5, 12.0, 10.0, 11.75, 1500.0);
        series.push_bar(date(3), 11.75, 13.0, 11.0, 12.5, 900.0);
        series.push_bar(date(4), 12.5, 12.5, 10.0, 10.25, 2000.0);
        series
    }

    #[test]
    fn valid_series_passes() {
        let series = sample();
        assert!(series.validate().is_ok());
        assert_eq!(series.len(), 4);
        assert_eq!(series.dates.first(), Some(&date(1)));
        assert_eq!(series.last_date(), Some(date(4)));
    }

    #[test]
    fn close_points_drop_other_columns() {
        let points = sample().close_points();
        assert_eq!(points.len(), 4);
        assert_eq!(points[1], PricePoint::new(date(2), 11.75));
    }

    #[test]
    fn duplicate_or_unordered_dates_fail() {
        let mut series = sample();
        series.dates[2] = date(2);
        assert!(series.validate().is_err());

        let mut series = sample();
        series.dates.swap(0, 3);
        assert!(series.validate().is_err());
    }

    #[test]
    fn ragged_columns_and_empty_series_fail() {
        let mut series = sample();
        series.volumes.pop();
        assert!(series.validate().is_err());

        assert!(DailySeries::new("AMC").validate().is_err());
    }

    #[test]
    fn retain_range_is_end_exclusive() {
        let mut series = sample();
        series.retain_range(date(2), date(4));
        assert_eq!(series.dates, vec![date(2), date(3)]);
        assert_eq!(series.close_prices, vec![11.75, 12.5]);
        assert_eq!(series.volumes, vec![1500.0, 900.0]);
        assert!(series.validate().is_ok());
    }
}
