//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. Every read site is additionally gated by
//! `cfg(debug_assertions)`.

pub struct DebugFlags {
    /// Emit detailed cache serialization/deserialization logs.
    pub print_serde: bool,
    /// Emit one log line per page of klines fetched from Binance.
    pub print_binance_pages: bool,
    /// Emit the request URL and row counts for Yahoo chart calls.
    pub print_yahoo_requests: bool,
    /// Emit UI state serialization/deserialization logs.
    pub print_state_serde: bool,
    /// Emit UI interaction logs (layer toggles, row selection).
    pub print_ui_interactions: bool,
    /// Emit shutdown app messages.
    pub print_shutdown: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_serde: false,
    print_binance_pages: false,
    print_yahoo_requests: false,
    print_state_serde: false,
    print_ui_interactions: false,
    print_shutdown: false,
};
