use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::BINANCE;
use crate::utils::TimeUtils;
use crate::utils::time_utils::format_date;

/// Everything a price provider needs for one fetch.
/// `end` is exclusive, matching the history call this replaces.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct TickerRequest {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval_ms: i64,
}

impl TickerRequest {
    pub fn new(symbol: &str, start: NaiveDate, end: NaiveDate, interval_ms: i64) -> Result<Self> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            bail!("Ticker symbol must not be empty");
        }
        if start >= end {
            bail!(
                "Start date {} must be before end date {}",
                format_date(start),
                format_date(end)
            );
        }
        if TimeUtils::interval_to_string(interval_ms) == "unknown" {
            bail!("Unsupported interval: {}ms", interval_ms);
        }
        Ok(Self {
            symbol,
            start,
            end,
            interval_ms,
        })
    }

    // Finds the trading quote at the end of the symbol and returns it.
    // Returns None if no matching quote is found.
    pub fn get_quote(text: &str) -> Option<&str> {
        BINANCE
            .quote_assets
            .iter()
            .find(|&&ext| text.ends_with(ext) && text.len() > ext.len())
            .copied()
    }

    /// Ends in a known quote asset. Equity tickers such as GBTC match too.
    pub fn is_crypto_pair(&self) -> bool {
        Self::get_quote(&self.symbol).is_some()
    }

    /// Quoted in a stablecoin ("BTCUSDT"), so Binance is the first choice.
    pub fn is_stablecoin_pair(&self) -> bool {
        Self::get_quote(&self.symbol)
            .is_some_and(|quote| BINANCE.stable_quote_assets.iter().any(|&s| s == quote))
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl std::fmt::Display for TickerRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} [{} .. {}) @ {}",
            self.symbol,
            format_date(self.start),
            format_date(self.end),
            TimeUtils::interval_to_string(self.interval_ms)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn normalises_symbol() {
        let req = TickerRequest::new(" amc ", date(2019, 9, 1), date(2021, 8, 29), TimeUtils::MS_IN_D)
            .unwrap();
        assert_eq!(req.symbol(), "AMC");
        assert_eq!(req.to_string(), "AMC [2019-09-01 .. 2021-08-29) @ 1d");
    }

    #[test]
    fn rejects_bad_requests() {
        let d = TimeUtils::MS_IN_D;
        assert!(TickerRequest::new("", date(2020, 1, 1), date(2020, 2, 1), d).is_err());
        assert!(TickerRequest::new("AMC", date(2020, 2, 1), date(2020, 2, 1), d).is_err());
        assert!(TickerRequest::new("AMC", date(2020, 2, 1), date(2020, 1, 1), d).is_err());
        assert!(TickerRequest::new("AMC", date(2020, 1, 1), date(2020, 2, 1), 12_345).is_err());
    }

    #[test]
    fn detects_crypto_pairs() {
        let make = |s: &str| {
            TickerRequest::new(s, date(2020, 1, 1), date(2020, 2, 1), TimeUtils::MS_IN_D).unwrap()
        };
        assert!(make("btcusdt").is_crypto_pair());
        assert!(make("ETHBTC").is_crypto_pair());
        assert!(!make("AMC").is_crypto_pair());
        // A bare quote asset is not a pair
        assert!(!make("ETH").is_crypto_pair());
    }

    #[test]
    fn only_stablecoin_quotes_are_certain_pairs() {
        let make = |s: &str| {
            TickerRequest::new(s, date(2020, 1, 1), date(2020, 2, 1), TimeUtils::MS_IN_D).unwrap()
        };
        assert!(make("BTCUSDT").is_stablecoin_pair());
        assert!(make("ethfdusd").is_stablecoin_pair());
        assert!(!make("ETHBTC").is_stablecoin_pair());
        // Grayscale Bitcoin Trust and ProShares Short Ether are equities
        assert!(!make("GBTC").is_stablecoin_pair());
        assert!(!make("SETH").is_stablecoin_pair());
        assert!(!make("USDT").is_stablecoin_pair());
    }
}
