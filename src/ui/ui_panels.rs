use chrono::NaiveDate;
use eframe::egui::{Grid, RichText, ScrollArea, Ui};
use strum::IntoEnumIterator;

use crate::config::PLOT_CONFIG;
use crate::domain::TickerRequest;
use crate::models::{SignalRow, SignalSeries};
use crate::ui::app_state::{PlotSeries, PlotVisibility};
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{format_optional_price, format_price, section_heading, spaced_separator};
use crate::utils::TimeUtils;
use crate::utils::time_utils::format_date;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Trait for UI panels that can be rendered
pub trait Panel {
    type Event;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event>;
}

// ============================================================================
// Layer toggles
// ============================================================================

pub struct LayerTogglePanel {
    visibility: PlotVisibility,
}

impl LayerTogglePanel {
    pub fn new(visibility: PlotVisibility) -> Self {
        Self { visibility }
    }
}

impl Panel for LayerTogglePanel {
    type Event = PlotSeries;

    /// Emits one event per series whose checkbox was clicked this frame.
    fn render(&mut self, ui: &mut Ui) -> Vec<PlotSeries> {
        let mut toggled = Vec::new();
        section_heading(ui, UI_TEXT.layers_heading);
        for (idx, series) in PlotSeries::iter().enumerate() {
            let label = format!("{} [{}]", series, idx + 1);
            if ui.checkbox(self.visibility.flag_mut(series), label).changed() {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_ui_interactions {
                    log::info!("[layers] {} -> {}", series, self.visibility.is_visible(series));
                }
                toggled.push(series);
            }
        }
        toggled
    }
}

// ============================================================================
// Strategy summary (read-only: parameters come from the command line)
// ============================================================================

pub struct StrategyPanel<'a> {
    request: &'a TickerRequest,
    series: &'a SignalSeries,
}

impl<'a> StrategyPanel<'a> {
    pub fn new(request: &'a TickerRequest, series: &'a SignalSeries) -> Self {
        Self { request, series }
    }
}

impl Panel for StrategyPanel<'_> {
    type Event = ();

    fn render(&mut self, ui: &mut Ui) -> Vec<()> {
        let params = self.series.params;
        section_heading(ui, UI_TEXT.strategy_heading);
        Grid::new("strategy_grid")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label_subdued("Symbol");
                ui.label(RichText::new(self.request.symbol()).strong());
                ui.end_row();

                // Latest values; "-" while the window is still warming up
                let last = self.series.last();
                ui.label_subdued("Fast");
                ui.label(
                    RichText::new(format!(
                        "{} {}",
                        params.short_label(),
                        format_optional_price(last.and_then(|row| row.short_sma))
                    ))
                    .color(PLOT_CONFIG.short_sma_color),
                );
                ui.end_row();

                ui.label_subdued("Slow");
                ui.label(
                    RichText::new(format!(
                        "{} {}",
                        params.long_label(),
                        format_optional_price(last.and_then(|row| row.long_sma))
                    ))
                    .color(PLOT_CONFIG.long_sma_color),
                );
                ui.end_row();

                ui.label_subdued("From");
                ui.label(format_date(self.request.start));
                ui.end_row();

                ui.label_subdued("Until");
                ui.label(format_date(self.request.end));
                ui.end_row();

                ui.label_subdued("Interval");
                ui.label(TimeUtils::interval_to_string(self.request.interval_ms));
                ui.end_row();
            });

        if !self.series.is_empty() && self.series.len() < params.long_window() {
            ui.add_space(4.0);
            ui.label_warning(UI_TEXT.short_history_warning);
        }
        Vec::new()
    }
}

// ============================================================================
// Entry / exit lists
// ============================================================================

pub struct TransitionsPanel<'a> {
    series: &'a SignalSeries,
    selected_date: Option<NaiveDate>,
}

impl<'a> TransitionsPanel<'a> {
    pub fn new(series: &'a SignalSeries, selected_date: Option<NaiveDate>) -> Self {
        Self {
            series,
            selected_date,
        }
    }

    fn render_rows<'r>(
        &self,
        ui: &mut Ui,
        rows: impl Iterator<Item = &'r SignalRow>,
        selected: &mut Vec<NaiveDate>,
    ) {
        let mut any = false;
        for row in rows {
            any = true;
            let text = format!("{}  {}", format_date(row.date), format_price(row.close));
            let is_selected = self.selected_date == Some(row.date);
            let text = if is_selected {
                RichText::new(text).monospace().color(UI_CONFIG.colors.selected_row)
            } else {
                RichText::new(text).monospace()
            };
            if ui.selectable_label(is_selected, text).clicked() {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_ui_interactions {
                    log::info!("[signals] Selected {}", format_date(row.date));
                }
                selected.push(row.date);
            }
        }
        if !any {
            ui.label_subdued(UI_TEXT.no_transitions);
        }
    }
}

impl Panel for TransitionsPanel<'_> {
    type Event = NaiveDate;

    /// Emits the date of every row clicked this frame.
    fn render(&mut self, ui: &mut Ui) -> Vec<NaiveDate> {
        let mut selected = Vec::new();
        spaced_separator(ui);
        section_heading(ui, UI_TEXT.transitions_heading);

        ScrollArea::vertical()
            .max_height(UI_CONFIG.transitions_list_height)
            .id_salt("transitions_panel")
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!(
                        "{} ({})",
                        UI_TEXT.entries_subheading,
                        self.series.entries().count()
                    ))
                    .color(PLOT_CONFIG.entry_color),
                );
                self.render_rows(ui, self.series.entries(), &mut selected);

                ui.add_space(8.0);
                ui.label(
                    RichText::new(format!(
                        "{} ({})",
                        UI_TEXT.exits_subheading,
                        self.series.exits().count()
                    ))
                    .color(PLOT_CONFIG.exit_color),
                );
                self.render_rows(ui, self.series.exits(), &mut selected);
            });
        selected
    }
}
