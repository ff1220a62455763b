use eframe::egui::{
    CentralPanel, Context, Frame, Grid, Key, Margin, RichText, SidePanel, TopBottomPanel, Ui,
    Window,
};
use strum::IntoEnumIterator;

use crate::ui::app_state::PlotSeries;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_panels::{LayerTogglePanel, Panel, StrategyPanel, TransitionsPanel};
use crate::ui::utils::format_price;

use super::app::GoldenCrossApp;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

impl GoldenCrossApp {
    pub(super) fn render_side_panel(&mut self, ctx: &Context) {
        let side_panel_frame = Frame::new()
            .fill(UI_CONFIG.colors.side_panel)
            .inner_margin(Margin::symmetric(8, 4));
        SidePanel::left("left_panel")
            .min_width(UI_CONFIG.side_panel_min_width)
            .frame(side_panel_frame)
            .show(ctx, |ui| {
                let toggled = LayerTogglePanel::new(self.ui_state.plot_visibility).render(ui);
                for series in toggled {
                    self.ui_state.plot_visibility.toggle(series);
                }

                StrategyPanel::new(&self.data_state.request, &self.data_state.series).render(ui);

                let selected =
                    TransitionsPanel::new(&self.data_state.series, self.ui_state.selected_date)
                        .render(ui);
                for date in selected {
                    self.ui_state.select_date(date);
                }
            });
    }

    pub(super) fn render_central_panel(&mut self, ctx: &Context) {
        let central_panel_frame = Frame::new().fill(UI_CONFIG.colors.central_panel);
        CentralPanel::default()
            .frame(central_panel_frame)
            .show(ctx, |ui| {
                ui.add_space(10.0);

                if self.data_state.series.is_empty() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.heading(format!("⚠ {}", UI_TEXT.empty_series));
                        ui.add_space(10.0);
                        ui.label(self.data_state.request.to_string());
                    });
                    return;
                }

                self.plot_view.show_signal_plot(
                    ui,
                    &self.data_state.series,
                    &self.ui_state.plot_visibility,
                    self.ui_state.selected_date,
                );
            });
    }

    pub(super) fn render_status_panel(&mut self, ctx: &Context) {
        let status_frame = Frame::new()
            .fill(UI_CONFIG.colors.side_panel)
            .inner_margin(Margin::symmetric(8, 4));
        TopBottomPanel::bottom("status_panel")
            .frame(status_frame)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let series = &self.data_state.series;

                    ui.metric(
                        &format!("📡 {}", UI_TEXT.label_source),
                        self.data_state.source,
                        UI_CONFIG.colors.heading,
                    );
                    ui.separator();

                    ui.metric(
                        &format!("📊 {}", UI_TEXT.label_rows),
                        &series.len().to_string(),
                        UI_CONFIG.colors.label,
                    );
                    ui.separator();

                    if let Some(last) = series.last() {
                        ui.metric(
                            &format!("💰 {}", UI_TEXT.label_last_close),
                            &format!("{} ({})", format_price(last.close), last.date),
                            UI_CONFIG.colors.subsection_heading,
                        );
                        ui.separator();
                    }

                    ui.position_badge(series.current_signal());
                    ui.separator();

                    ui.label_subdued(format!(
                        "{} {} / {} {}",
                        series.entries().count(),
                        UI_TEXT.label_entries,
                        series.exits().count(),
                        UI_TEXT.label_exits,
                    ));
                });
            });
    }

    fn render_shortcut_rows(ui: &mut Ui, rows: &[(String, String)]) {
        for (key, description) in rows {
            ui.label(RichText::new(key.as_str()).monospace().strong());
            ui.label(description.as_str());
            ui.end_row();
        }
    }

    pub(super) fn render_help_panel(&mut self, ctx: &Context) {
        let mut shortcuts: Vec<(String, String)> =
            vec![("H".to_string(), "Toggle this help panel".to_string())];
        shortcuts.extend(PlotSeries::iter().enumerate().map(|(idx, series)| {
            (
                (idx + 1).to_string(),
                format!("{} {}", UI_TEXT.help_toggle, series),
            )
        }));
        shortcuts.push(("Esc".to_string(), UI_TEXT.help_clear_selection.to_string()));

        Window::new(UI_TEXT.help_heading)
            .open(&mut self.ui_state.show_help)
            .resizable(false)
            .collapsible(false)
            .default_width(360.0)
            .show(ctx, |ui| {
                ui.label("Press any key to execute the command:");
                ui.add_space(5.0);

                Grid::new("general_shortcuts_grid")
                    .num_columns(2)
                    .spacing([20.0, 8.0])
                    .striped(true)
                    .show(ui, |ui| {
                        Self::render_shortcut_rows(ui, &shortcuts);
                    });
            });
    }

    pub(super) fn handle_global_shortcuts(&mut self, ctx: &Context) {
        ctx.input(|i| {
            // Use 1/2/3 keys to toggle plot layers
            let layer_keys = [Key::Num1, Key::Num2, Key::Num3];
            for (key, series) in layer_keys.into_iter().zip(PlotSeries::iter()) {
                if i.key_pressed(key) {
                    self.ui_state.plot_visibility.toggle(series);
                    #[cfg(debug_assertions)]
                    if DEBUG_FLAGS.print_ui_interactions {
                        log::info!("[keys] Toggled {}", series);
                    }
                }
            }

            if i.key_pressed(Key::H) {
                self.ui_state.show_help = !self.ui_state.show_help;
            }

            if i.key_pressed(Key::Escape) {
                if self.ui_state.show_help {
                    self.ui_state.show_help = false;
                } else {
                    self.ui_state.selected_date = None;
                }
            }
        });
    }
}
