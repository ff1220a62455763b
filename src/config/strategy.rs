//! Strategy defaults. Every field can be overridden from the command line.

use crate::utils::TimeUtils;

pub struct StrategyConfig {
    /// Ticker symbol to analyse (equity by default; crypto pairs go to Binance)
    pub symbol: &'static str,
    /// Window of the fast simple moving average, in rows
    pub short_window: usize,
    /// Window of the slow simple moving average, in rows. Must exceed `short_window`
    pub long_window: usize,
    /// First calendar day requested (inclusive), `YYYY-MM-DD`
    pub start_date: &'static str,
    /// Last calendar day requested (exclusive), `YYYY-MM-DD`
    pub end_date: &'static str,
    /// Sampling interval of the price history
    pub interval_ms: i64,
    /// Rows logged by `--print-tail` when no count is given
    pub default_tail_rows: usize,
}

pub const STRATEGY: StrategyConfig = StrategyConfig {
    symbol: "AMC",
    short_window: 50,
    long_window: 100,
    start_date: "2019-09-01",
    end_date: "2021-08-29",
    interval_ms: TimeUtils::MS_IN_D,
    default_tail_rows: 10,
};
