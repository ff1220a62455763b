// Data loading and caching
pub mod pre_main_async;
pub mod timeseries;

// Re-export commonly used types
pub use pre_main_async::fetch_price_data;
pub use timeseries::serde_version::write_daily_series_async;
pub use timeseries::{FetchedSeries, PriceSource, SourceKind};
