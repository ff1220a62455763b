//! Configuration module for the golden cross application.

pub mod binance;
pub mod persistence;
pub mod plot;
pub mod strategy;
pub mod yahoo;

mod debug; // Private: files use crate::config::DEBUG_FLAGS, not crate::config::debug::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

// Re-export commonly used items
pub use binance::BINANCE;
pub use persistence::{PERSISTENCE, cache_filename};
pub use plot::PLOT_CONFIG;
pub use strategy::STRATEGY;
pub use yahoo::YAHOO;
