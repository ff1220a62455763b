//! Binance-specific configuration constants and types.

/// Configuration for Binance REST API client
/// (This is the runtime struct used by the Http Client)
pub struct BinanceApiConfig {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

impl Default for BinanceApiConfig {
    fn default() -> Self {
        Self {
            timeout_ms: BINANCE.client.timeout_ms,
            retries: BINANCE.client.retries,
            backoff_ms: BINANCE.client.backoff_ms,
        }
    }
}

/// Configuration for REST API Limits
pub struct RestLimits {
    /// Maximum number of klines returned in a single request
    pub klines_limit: i32,
    /// Safety cap on pages fetched for one symbol
    pub max_pages: usize,
}

/// Default values for the Rest Client
pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

/// The Master Configuration Struct
pub struct BinanceConfig {
    pub limits: RestLimits,
    pub client: ClientDefaults,
    /// Symbols ending in one of these look like crypto pairs
    pub quote_assets: &'static [&'static str],
    /// Subset of `quote_assets` that no equity ticker ends in; these go to Binance first
    pub stable_quote_assets: &'static [&'static str],
}

pub const BINANCE: BinanceConfig = BinanceConfig {
    limits: RestLimits {
        klines_limit: 1000,
        max_pages: 50,
    },
    client: ClientDefaults {
        timeout_ms: 5000,
        retries: 5,
        backoff_ms: 5000,
    },
    quote_assets: &["USDT", "USDC", "FDUSD", "BTC", "ETH"],
    stable_quote_assets: &["USDT", "USDC", "FDUSD"],
};
