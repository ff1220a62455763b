// Domain types and value objects
pub mod price_point;
pub mod ticker_request;

// Re-export commonly used types
pub use price_point::PricePoint;
pub use ticker_request::TickerRequest;
