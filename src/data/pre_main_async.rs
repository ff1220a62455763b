// Async code to run in main before egui starts up

use anyhow::Result;
use itertools::Itertools;

use crate::Cli;
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::PERSISTENCE;
use crate::data::timeseries::serde_version::{SerdeVersion, check_local_data_validity};
use crate::data::timeseries::{FetchedSeries, PriceSource, get_daily_series_async};
use crate::domain::TickerRequest;

/// Order the providers for one request.
/// A valid cache is tried first unless `prefer_api` is set; an invalid one is never tried.
pub fn provider_chain(request: &TickerRequest, args: &Cli) -> Vec<Box<dyn PriceSource>> {
    let mut remote = args.source.remote_providers(request);
    match (
        args.prefer_api,
        check_local_data_validity(request, PERSISTENCE.max_age_secs, PERSISTENCE.version),
    ) {
        (false, Ok(_)) => {
            // local first
            remote.insert(0, Box::new(SerdeVersion));
            remote
        }
        (true, Ok(_)) => {
            // API first
            remote.push(Box::new(SerdeVersion));
            remote
        }
        (_, Err(e)) => {
            log::warn!("⚠️  Local cache validation failed: {:#}", e);
            log::warn!(
                "⚠️  Falling back to {}...",
                remote.iter().map(|p| p.signature()).join(" then ")
            );
            remote // API only
        }
    }
}

// Runs before the GUI starts at all, so can't rely on gui app state
pub async fn fetch_price_data(request: &TickerRequest, args: &Cli) -> Result<FetchedSeries> {
    let providers = provider_chain(request, args);
    let fetched = get_daily_series_async(&providers, request).await?;

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_serde {
        log::info!(
            "Successfully retrieved {} rows for {} using: {}.",
            fetched.series.len(),
            request,
            fetched.source
        );
    }
    Ok(fetched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn signatures(argv: &[&str]) -> Vec<&'static str> {
        let args = Cli::parse_from(argv);
        let request = args.ticker_request().unwrap();
        provider_chain(&request, &args)
            .iter()
            .map(|p| p.signature())
            .collect()
    }

    #[test]
    fn equity_etf_chain_reaches_yahoo() {
        // Symbol ends in BTC but is an equity; window chosen so no cache file exists
        let chain = signatures(&[
            "golden-cross",
            "--symbol",
            "GBTC",
            "--start",
            "1990-01-01",
            "--end",
            "1990-06-01",
        ]);
        assert_eq!(chain.first(), Some(&"Yahoo Finance"));
        assert!(chain.contains(&"Binance API"));
    }

    #[test]
    fn explicit_source_has_no_remote_fallback() {
        let chain = signatures(&[
            "golden-cross",
            "--symbol",
            "BTCUSDT",
            "--source",
            "binance",
            "--start",
            "1990-01-01",
            "--end",
            "1990-06-01",
        ]);
        assert!(!chain.contains(&"Yahoo Finance"));
    }
}
