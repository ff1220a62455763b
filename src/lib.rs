#![allow(clippy::collapsible_if)]

// Core modules
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use data::{FetchedSeries, PriceSource, SourceKind, fetch_price_data};
pub use domain::{PricePoint, TickerRequest};
pub use models::{DailySeries, Signal, SignalDeriver, SignalRow, SignalSeries, StrategyParams};
pub use ui::GoldenCrossApp;

// CLI argument parsing
use chrono::NaiveDate;
use clap::Parser;

use crate::config::STRATEGY;
use crate::utils::time_utils::parse_date;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Golden cross (SMA crossover) signals for one ticker", long_about = None)]
pub struct Cli {
    /// Ticker to analyse, e.g. AMC or BTCUSDT
    #[arg(long, default_value = STRATEGY.symbol)]
    pub symbol: String,

    /// Window of the fast moving average, in rows
    #[arg(long, default_value_t = STRATEGY.short_window)]
    pub short_window: usize,

    /// Window of the slow moving average, in rows
    #[arg(long, default_value_t = STRATEGY.long_window)]
    pub long_window: usize,

    /// First day requested (inclusive), YYYY-MM-DD
    #[arg(long, default_value = STRATEGY.start_date, value_parser = parse_date)]
    pub start: NaiveDate,

    /// Last day requested (exclusive), YYYY-MM-DD
    #[arg(long, default_value = STRATEGY.end_date, value_parser = parse_date)]
    pub end: NaiveDate,

    /// Remote price provider
    #[arg(long, value_enum, default_value_t = SourceKind::Auto)]
    pub source: SourceKind,

    /// Use API as primary source instead of the local cache
    #[arg(long, default_value_t = false)]
    pub prefer_api: bool,

    /// Log the signal table instead of opening the chart window
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// Log the last N rows of the signal table
    #[arg(long, value_name = "N")]
    pub print_tail: Option<usize>,
}

impl Cli {
    pub fn strategy_params(&self) -> anyhow::Result<StrategyParams> {
        Ok(StrategyParams::new(self.short_window, self.long_window)?)
    }

    pub fn ticker_request(&self) -> anyhow::Result<TickerRequest> {
        TickerRequest::new(&self.symbol, self.start, self.end, STRATEGY.interval_ms)
    }
}

/// Logs the header, the last `rows` table lines, then every entry and exit.
pub fn log_signal_summary(series: &SignalSeries, rows: usize) {
    if rows > 0 {
        log::info!("{}", series.table_header());
        for row in series.tail(rows) {
            log::info!("{}", row);
        }
    }
    for row in series.entries() {
        log::info!("Entry {} at {:.4}", row.date, row.close);
    }
    for row in series.exits() {
        log::info!("Exit  {} at {:.4}", row.date, row.close);
    }
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(
    cc: &eframe::CreationContext,
    request: TickerRequest,
    series: SignalSeries,
    source: &'static str,
) -> Box<dyn eframe::App> {
    let app = ui::GoldenCrossApp::new(cc, request, series, source);
    Box::new(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_strategy_config() {
        let cli = Cli::parse_from(["golden-cross"]);
        assert_eq!(cli.symbol, "AMC");
        assert_eq!(cli.short_window, 50);
        assert_eq!(cli.long_window, 100);
        assert_eq!(cli.start, NaiveDate::from_ymd_opt(2019, 9, 1).unwrap());
        assert_eq!(cli.end, NaiveDate::from_ymd_opt(2021, 8, 29).unwrap());
        assert_eq!(cli.source, SourceKind::Auto);
        assert!(!cli.prefer_api && !cli.headless);
        assert_eq!(cli.print_tail, None);

        let request = cli.ticker_request().unwrap();
        assert_eq!(request.to_string(), "AMC [2019-09-01 .. 2021-08-29) @ 1d");
        assert_eq!(cli.strategy_params().unwrap().long_label(), "SMA100");
    }

    #[test]
    fn overrides_are_parsed() {
        let cli = Cli::parse_from([
            "golden-cross",
            "--symbol",
            "btcusdt",
            "--short-window",
            "20",
            "--long-window",
            "60",
            "--start",
            "2022-01-01",
            "--end",
            "2023-01-01",
            "--source",
            "binance",
            "--headless",
            "--print-tail",
            "5",
        ]);
        assert_eq!(cli.source, SourceKind::Binance);
        assert_eq!(cli.print_tail, Some(5));
        assert!(cli.headless);
        let request = cli.ticker_request().unwrap();
        assert_eq!(request.symbol(), "BTCUSDT");
        assert_eq!(request.end, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(cli.strategy_params().unwrap().short_window(), 20);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(Cli::try_parse_from(["golden-cross", "--start", "01/09/2019"]).is_err());
        assert!(Cli::try_parse_from(["golden-cross", "--source", "bloomberg"]).is_err());

        let cli = Cli::parse_from(["golden-cross", "--short-window", "100", "--long-window", "50"]);
        assert!(cli.strategy_params().is_err());

        let cli = Cli::parse_from(["golden-cross", "--start", "2021-08-29"]);
        assert!(cli.ticker_request().is_err());
    }
}
