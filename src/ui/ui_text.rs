/// Every user-facing string in the GUI, kept in one place.
pub struct UiText {
    pub window_title_prefix: &'static str,
    pub layers_heading: &'static str,
    pub strategy_heading: &'static str,
    pub transitions_heading: &'static str,
    pub entries_subheading: &'static str,
    pub exits_subheading: &'static str,
    pub no_transitions: &'static str,
    pub plot_x_axis: &'static str,
    pub label_close_price: &'static str,
    pub label_entries: &'static str,
    pub label_exits: &'static str,
    pub label_selection: &'static str,
    pub label_position_long: &'static str,
    pub label_position_flat: &'static str,
    pub label_source: &'static str,
    pub label_rows: &'static str,
    pub label_last_close: &'static str,
    pub label_position: &'static str,
    pub empty_series: &'static str,
    pub short_history_warning: &'static str,
    pub help_heading: &'static str,
    pub help_toggle: &'static str,
    pub help_clear_selection: &'static str,
}

pub const UI_TEXT: UiText = UiText {
    window_title_prefix: "Golden Cross",
    layers_heading: "Layers",
    strategy_heading: "Strategy",
    transitions_heading: "Signals",
    entries_subheading: "Entries (golden cross)",
    exits_subheading: "Exits (death cross)",
    no_transitions: "None in range",
    plot_x_axis: "Date",
    label_close_price: "Close",
    label_entries: "Entry",
    label_exits: "Exit",
    label_selection: "Selected",
    label_position_long: "LONG",
    label_position_flat: "FLAT",
    label_source: "Source",
    label_rows: "Rows",
    label_last_close: "Last close",
    label_position: "Position",
    empty_series: "No price rows in the requested range",
    short_history_warning: "Fewer rows than the long window: no signal can fire",
    help_heading: "⌨️ Keyboard Shortcuts",
    help_toggle: "Toggle",
    help_clear_selection: "Clear selected signal",
};
