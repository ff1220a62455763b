pub mod bnapi_version;
pub mod cache_file;
pub mod serde_version;
pub mod yahoo_version;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use clap::ValueEnum;

use crate::domain::TickerRequest;
use crate::models::DailySeries;

#[async_trait]
pub trait PriceSource: Send + Sync {
    // Either fetch a validated daily series OR return an anyhow::error
    async fn fetch(&self, request: &TickerRequest) -> Result<DailySeries>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;

    /// Remote results are worth caching; cache reads are not.
    fn is_remote(&self) -> bool {
        true
    }
}

/// Which remote provider to ask for prices.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// Binance for stablecoin pairs (e.g. BTCUSDT), Yahoo Finance otherwise
    #[default]
    Auto,
    Yahoo,
    Binance,
}

impl SourceKind {
    pub fn resolve(self, request: &TickerRequest) -> SourceKind {
        match self {
            SourceKind::Auto if request.is_stablecoin_pair() => SourceKind::Binance,
            SourceKind::Auto => SourceKind::Yahoo,
            explicit => explicit,
        }
    }

    /// Remote providers in the order they are tried.
    /// `Auto` adds the other provider as a fallback when the symbol ends in a quote asset
    /// (ETHBTC is a pair, GBTC is an equity).
    pub fn remote_providers(self, request: &TickerRequest) -> Vec<Box<dyn PriceSource>> {
        let primary = self.resolve(request);
        let mut kinds = vec![primary];
        if self == SourceKind::Auto && request.is_crypto_pair() {
            kinds.push(match primary {
                SourceKind::Binance => SourceKind::Yahoo,
                _ => SourceKind::Binance,
            });
        }
        kinds.into_iter().map(SourceKind::provider).collect()
    }

    fn provider(self) -> Box<dyn PriceSource> {
        match self {
            SourceKind::Binance => Box::new(bnapi_version::BNAPIVersion),
            _ => Box::new(yahoo_version::YahooVersion),
        }
    }
}

/// A series plus where it came from.
#[derive(Debug, Clone)]
pub struct FetchedSeries {
    pub series: DailySeries,
    pub source: &'static str,
    /// Worth writing back to the cache
    pub is_remote: bool,
}

pub async fn get_daily_series_async(
    implementations: &[Box<dyn PriceSource>],
    request: &TickerRequest,
) -> Result<FetchedSeries> {
    for imp in implementations {
        match imp.fetch(request).await {
            Ok(series) => {
                return Ok(FetchedSeries {
                    series,
                    source: imp.signature(),
                    is_remote: imp.is_remote(),
                });
            }
            Err(e) => {
                log::warn!("⚠️  {} failed for {}: {:#}", imp.signature(), request, e);
                // Continue to the next implementation
            }
        }
    }
    Err(anyhow!(
        "All price sources failed to provide data for {}",
        request
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TimeUtils;
    use anyhow::bail;
    use chrono::NaiveDate;

    struct Failing;
    struct Fixed(&'static str);
    struct Cached;

    #[async_trait]
    impl PriceSource for Failing {
        async fn fetch(&self, _request: &TickerRequest) -> Result<DailySeries> {
            bail!("offline")
        }
        fn signature(&self) -> &'static str {
            "Failing"
        }
    }

    #[async_trait]
    impl PriceSource for Fixed {
        async fn fetch(&self, request: &TickerRequest) -> Result<DailySeries> {
            let mut series = DailySeries::new(request.symbol());
            series.push_bar(request.start, 1.0, 1.0, 1.0, 1.0, 0.0);
            Ok(series)
        }
        fn signature(&self) -> &'static str {
            self.0
        }
    }

    #[async_trait]
    impl PriceSource for Cached {
        async fn fetch(&self, request: &TickerRequest) -> Result<DailySeries> {
            Fixed("cache").fetch(request).await
        }
        fn signature(&self) -> &'static str {
            "Cached"
        }
        fn is_remote(&self) -> bool {
            false
        }
    }

    fn request(symbol: &str) -> TickerRequest {
        TickerRequest::new(
            symbol,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
            TimeUtils::MS_IN_D,
        )
        .unwrap()
    }

    fn signatures(kind: SourceKind, symbol: &str) -> Vec<&'static str> {
        kind.remote_providers(&request(symbol))
            .iter()
            .map(|p| p.signature())
            .collect()
    }

    #[tokio::test]
    async fn falls_through_to_first_working_source() {
        let providers: Vec<Box<dyn PriceSource>> =
            vec![Box::new(Failing), Box::new(Fixed("second")), Box::new(Fixed("third"))];
        let fetched = get_daily_series_async(&providers, &request("AMC"))
            .await
            .unwrap();
        assert_eq!(fetched.source, "second");
        assert_eq!(fetched.series.symbol, "AMC");
        assert!(fetched.is_remote);
    }

    #[tokio::test]
    async fn cache_hits_are_not_remote() {
        let providers: Vec<Box<dyn PriceSource>> = vec![Box::new(Cached), Box::new(Fixed("api"))];
        let fetched = get_daily_series_async(&providers, &request("AMC"))
            .await
            .unwrap();
        assert_eq!(fetched.source, "Cached");
        assert!(!fetched.is_remote);
    }

    #[tokio::test]
    async fn all_failing_is_an_error() {
        let providers: Vec<Box<dyn PriceSource>> = vec![Box::new(Failing), Box::new(Failing)];
        assert!(get_daily_series_async(&providers, &request("AMC")).await.is_err());
        assert!(get_daily_series_async(&[], &request("AMC")).await.is_err());
    }

    #[test]
    fn auto_source_follows_symbol_kind() {
        assert_eq!(SourceKind::Auto.resolve(&request("AMC")), SourceKind::Yahoo);
        assert_eq!(SourceKind::Auto.resolve(&request("BTCUSDT")), SourceKind::Binance);
        assert_eq!(SourceKind::Yahoo.resolve(&request("BTCUSDT")), SourceKind::Yahoo);
        assert_eq!(signatures(SourceKind::Binance, "AMC"), ["Binance API"]);
        assert_eq!(signatures(SourceKind::Auto, "AMC"), ["Yahoo Finance"]);
    }

    #[test]
    fn equities_ending_in_btc_or_eth_use_yahoo() {
        assert_eq!(SourceKind::Auto.resolve(&request("GBTC")), SourceKind::Yahoo);
        assert_eq!(SourceKind::Auto.resolve(&request("SETH")), SourceKind::Yahoo);
        assert_eq!(signatures(SourceKind::Auto, "GBTC"), ["Yahoo Finance", "Binance API"]);
    }

    #[test]
    fn auto_keeps_the_other_provider_as_fallback() {
        assert_eq!(signatures(SourceKind::Auto, "BTCUSDT"), ["Binance API", "Yahoo Finance"]);
        assert_eq!(signatures(SourceKind::Auto, "ETHBTC"), ["Yahoo Finance", "Binance API"]);
        // An explicit choice is never second-guessed
        assert_eq!(signatures(SourceKind::Binance, "GBTC"), ["Binance API"]);
        assert_eq!(signatures(SourceKind::Yahoo, "BTCUSDT"), ["Yahoo Finance"]);
    }
}
