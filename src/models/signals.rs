use std::fmt;

use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::price_point::{PricePoint, closes};
use crate::models::moving_average::rolling_mean;

// ============================================================================
// StrategyParams: the two moving-average windows
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    ZeroWindow,
    WindowOrder { short_window: usize, long_window: usize },
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SignalError::ZeroWindow => write!(f, "Short window must be at least 1"),
            SignalError::WindowOrder {
                short_window,
                long_window,
            } => write!(
                f,
                "Long window ({}) must be greater than short window ({})",
                long_window, short_window
            ),
        }
    }
}

impl std::error::Error for SignalError {}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrategyParams {
    short_window: usize,
    long_window: usize,
}

impl StrategyParams {
    pub fn new(short_window: usize, long_window: usize) -> Result<Self, SignalError> {
        if short_window == 0 {
            return Err(SignalError::ZeroWindow);
        }
        if long_window <= short_window {
            return Err(SignalError::WindowOrder {
                short_window,
                long_window,
            });
        }
        Ok(Self {
            short_window,
            long_window,
        })
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    /// Column name of the fast average, e.g. "SMA50".
    pub fn short_label(&self) -> String {
        format!("SMA{}", self.short_window)
    }

    /// Column name of the slow average, e.g. "SMA100".
    pub fn long_label(&self) -> String {
        format!("SMA{}", self.long_window)
    }
}

impl fmt::Display for StrategyParams {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} / {}", self.short_label(), self.long_label())
    }
}

// ============================================================================
// Signal and Transition
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    #[default]
    Flat,
    Long,
}

impl Signal {
    pub fn value(self) -> i8 {
        match self {
            Signal::Flat => 0,
            Signal::Long => 1,
        }
    }
}

/// Change of signal from the previous row: +1 entry, -1 exit, 0 unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Entry,
    Exit,
    Unchanged,
}

impl Transition {
    pub fn between(previous: Signal, current: Signal) -> Self {
        match current.value() - previous.value() {
            1 => Transition::Entry,
            -1 => Transition::Exit,
            _ => Transition::Unchanged,
        }
    }

    pub fn value(self) -> i8 {
        match self {
            Transition::Entry => 1,
            Transition::Exit => -1,
            Transition::Unchanged => 0,
        }
    }
}

// ============================================================================
// SignalRow / SignalSeries: the derived table
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub close: f64,
    pub short_sma: Option<f64>,
    pub long_sma: Option<f64>,
    pub signal: Signal,
    /// `None` on the first row only.
    pub transition: Option<Transition>,
}

impl SignalRow {
    pub fn is_entry(&self) -> bool {
        self.transition == Some(Transition::Entry)
    }

    pub fn is_exit(&self) -> bool {
        self.transition == Some(Transition::Exit)
    }
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "NaN".to_string())
}

/// One line of the signal table: date, close, both averages, signal, transition.
impl fmt::Display for SignalRow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let transition = self
            .transition
            .map(|t| format!("{:.1}", f64::from(t.value())))
            .unwrap_or_else(|| "NaN".to_string());
        write!(
            f,
            "{}  {:>12.4}  {:>12}  {:>12}  {:>6}  {:>10}",
            self.date,
            self.close,
            format_cell(self.short_sma),
            format_cell(self.long_sma),
            self.signal.value(),
            transition
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SignalSeries {
    pub params: StrategyParams,
    pub rows: Vec<SignalRow>,
}

impl SignalSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&SignalRow> {
        self.rows.last()
    }

    pub fn entries(&self) -> impl Iterator<Item = &SignalRow> {
        self.rows.iter().filter(|row| row.is_entry())
    }

    pub fn exits(&self) -> impl Iterator<Item = &SignalRow> {
        self.rows.iter().filter(|row| row.is_exit())
    }

    /// The last `n` rows (fewer if the series is shorter).
    pub fn tail(&self, n: usize) -> &[SignalRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }

    /// Column header lining up with `SignalRow`'s `Display`.
    pub fn table_header(&self) -> String {
        format!(
            "{:<10}  {:>12}  {:>12}  {:>12}  {:>6}  {:>10}",
            "Date",
            "Close",
            self.params.short_label(),
            self.params.long_label(),
            "Signal",
            "Position"
        )
    }

    /// Position held after the final row.
    pub fn current_signal(&self) -> Signal {
        self.last().map(|row| row.signal).unwrap_or_default()
    }
}

// ============================================================================
// SignalDeriver
// ============================================================================

pub struct SignalDeriver {
    params: StrategyParams,
}

impl SignalDeriver {
    pub fn new(params: StrategyParams) -> Self {
        Self { params }
    }

    /// Derive averages, signal and transitions for an ordered close series.
    ///
    /// Rows before index `short_window` stay flat. From there on a row is long
    /// only when both averages are defined and the short one is strictly above
    /// the long one, so rows still inside the long warm-up are flat too.
    /// Fewer than `long_window` points is not an error: every row is flat.
    pub fn derive(&self, points: &[PricePoint]) -> SignalSeries {
        let close_prices = closes(points);
        let short_sma = rolling_mean(&close_prices, self.params.short_window);
        let long_sma = rolling_mean(&close_prices, self.params.long_window);

        let signals: Vec<Signal> = short_sma
            .iter()
            .zip(&long_sma)
            .enumerate()
            .map(|(idx, (short, long))| self.signal_at(idx, *short, *long))
            .collect();

        let transitions = std::iter::once(None).chain(
            signals
                .iter()
                .tuple_windows()
                .map(|(previous, current)| Some(Transition::between(*previous, *current))),
        );

        let rows: Vec<SignalRow> = points
            .iter()
            .zip(short_sma)
            .zip(long_sma)
            .zip(signals.iter().copied())
            .zip(transitions)
            .map(|((((point, short), long), signal), transition)| SignalRow {
                date: point.date,
                close: point.close,
                short_sma: short,
                long_sma: long,
                signal,
                transition,
            })
            .collect();

        let series = SignalSeries {
            params: self.params,
            rows,
        };

        log::info!(
            "Derived {} signal rows ({}): {} entries, {} exits",
            series.len(),
            self.params,
            series.entries().count(),
            series.exits().count()
        );
        if !points.is_empty() && points.len() < self.params.long_window {
            log::warn!(
                "Only {} rows for a {}-row long window; no signal can fire",
                points.len(),
                self.params.long_window
            );
        }

        series
    }

    fn signal_at(&self, idx: usize, short: Option<f64>, long: Option<f64>) -> Signal {
        if idx < self.params.short_window {
            return Signal::Flat;
        }
        match (short, long) {
            (Some(short), Some(long)) if short > long => Signal::Long,
            _ => Signal::Flat,
        }
    }
}
