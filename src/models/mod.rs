// Domain models for golden cross analysis
// These modules contain pure business logic independent of UI/visualization

pub mod moving_average;
pub mod signals;
pub mod timeseries;

// Re-export key types for convenience
pub use moving_average::rolling_mean;
pub use signals::{
    Signal, SignalDeriver, SignalError, SignalRow, SignalSeries, StrategyParams, Transition,
};
pub use timeseries::DailySeries;
