use eframe::{Frame, egui};

use crate::domain::TickerRequest;
use crate::models::SignalSeries;
use crate::ui::app_state::UiState;
use crate::ui::ui_plot_view::PlotView;
use crate::ui::utils::setup_custom_visuals;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Everything loaded before the window opened. Read-only while the GUI runs.
pub struct DataState {
    pub request: TickerRequest,
    pub series: SignalSeries,
    /// Signature of the provider that supplied the prices
    pub source: &'static str,
}

pub struct GoldenCrossApp {
    pub(super) ui_state: UiState,
    pub(super) data_state: DataState,
    pub(super) plot_view: PlotView,
}

impl GoldenCrossApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        request: TickerRequest,
        series: SignalSeries,
        source: &'static str,
    ) -> Self {
        // Attempt to load the persisted state
        let persisted = cc
            .storage
            .and_then(|storage| eframe::get_value::<UiState>(storage, eframe::APP_KEY));
        let ui_state = match persisted {
            Some(state) => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_state_serde {
                    log::info!("Successfully loaded persisted UI state");
                }
                state
            }
            None => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_state_serde {
                    log::info!("No persisted UI state found. Creating anew.");
                }
                UiState::default()
            }
        };

        Self {
            ui_state,
            data_state: DataState {
                request,
                series,
                source,
            },
            plot_view: PlotView::new(),
        }
    }
}

impl eframe::App for GoldenCrossApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.plot_view.clear_cache();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_shutdown {
            log::info!("Application shutdown complete.");
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_state_serde {
            log::info!("Saving UI state: {:?}", self.ui_state);
        }
        eframe::set_value(storage, eframe::APP_KEY, &self.ui_state);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx);

        self.handle_global_shortcuts(ctx);

        // Side and status panels must claim space before the central panel
        self.render_side_panel(ctx);
        self.render_status_panel(ctx);
        self.render_central_panel(ctx);
        if self.ui_state.show_help {
            self.render_help_panel(ctx);
        }
    }
}
