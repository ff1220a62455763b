//! Yahoo Finance chart API configuration.

pub struct YahooConfig {
    /// Base URL of the chart endpoint (`{base_url}/v8/finance/chart/{symbol}`)
    pub base_url: &'static str,
    /// Yahoo rejects requests without a browser-like user agent
    pub user_agent: &'static str,
    pub timeout_ms: u64,
    /// Replace close with the split/dividend adjusted close (yfinance default)
    pub auto_adjust: bool,
}

pub const YAHOO: YahooConfig = YahooConfig {
    base_url: "https://query1.finance.yahoo.com",
    user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36",
    timeout_ms: 10_000,
    auto_adjust: true,
};
