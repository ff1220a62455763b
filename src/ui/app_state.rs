use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Togglable groups of plot items, in drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum PlotSeries {
    #[strum(to_string = "Close price")]
    ClosePrice,
    #[strum(to_string = "Moving averages")]
    MovingAverages,
    #[strum(to_string = "Entry / exit markers")]
    Transitions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotVisibility {
    pub close_price: bool,
    pub moving_averages: bool,
    pub transitions: bool,
}

impl Default for PlotVisibility {
    fn default() -> Self {
        Self {
            close_price: true,
            moving_averages: true,
            transitions: true,
        }
    }
}

impl PlotVisibility {
    pub fn is_visible(&self, series: PlotSeries) -> bool {
        match series {
            PlotSeries::ClosePrice => self.close_price,
            PlotSeries::MovingAverages => self.moving_averages,
            PlotSeries::Transitions => self.transitions,
        }
    }

    pub fn flag_mut(&mut self, series: PlotSeries) -> &mut bool {
        match series {
            PlotSeries::ClosePrice => &mut self.close_price,
            PlotSeries::MovingAverages => &mut self.moving_averages,
            PlotSeries::Transitions => &mut self.transitions,
        }
    }

    pub fn toggle(&mut self, series: PlotSeries) {
        let flag = self.flag_mut(series);
        *flag = !*flag;
    }
}

/// The part of the GUI state that survives restarts (eframe persistence).
/// Price data and derived signals are always rebuilt from the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
    pub plot_visibility: PlotVisibility,
    pub show_help: bool,
    /// Entry or exit picked in the side panel; drawn as a vertical marker
    #[serde(skip)]
    pub selected_date: Option<NaiveDate>,
}

impl UiState {
    /// Clicking the selected row again clears the selection.
    pub fn select_date(&mut self, date: NaiveDate) {
        if self.selected_date == Some(date) {
            self.selected_date = None;
        } else {
            self.selected_date = Some(date);
        }
    }
}
