use chrono::NaiveDate;
use eframe::egui;
use egui_plot::{AxisHints, Corner, HPlacement, Legend, Plot, PlotPoint};

use crate::config::PLOT_CONFIG;
use crate::models::{SignalRow, SignalSeries, StrategyParams};
use crate::ui::app_state::PlotVisibility;
use crate::ui::config::UI_TEXT;
use crate::ui::plot_layers::{
    ClosePriceLayer, EntryExitLayer, LayerContext, MovingAverageLayer, PlotLayer, SelectionLayer,
};
use crate::ui::utils::format_price;
use crate::utils::maths_utils;
use crate::utils::time_utils::{date_to_plot_x, format_date, plot_x_to_date};

/// Identifies the series a cache was built for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct SeriesKey {
    params: StrategyParams,
    rows: usize,
    first: Option<NaiveDate>,
    last: Option<NaiveDate>,
}

impl SeriesKey {
    fn of(series: &SignalSeries) -> Self {
        Self {
            params: series.params,
            rows: series.len(),
            first: series.rows.first().map(|row| row.date),
            last: series.last().map(|row| row.date),
        }
    }
}

/// Data bounds of everything the chart can draw, padded on the price axis.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PlotCache {
    key: SeriesKey,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl PlotCache {
    /// `None` for an empty series.
    pub fn from_series(series: &SignalSeries) -> Option<Self> {
        let first = series.rows.first()?;
        let last = series.last()?;

        let values: Vec<f64> = series
            .rows
            .iter()
            .flat_map(|row| [Some(row.close), row.short_sma, row.long_sma])
            .flatten()
            .filter(|v| v.is_finite())
            .collect();
        let (min, max) = maths_utils::get_min_max(&values)?;
        let (y_min, y_max) = maths_utils::pad_range(min, max, PLOT_CONFIG.y_padding_pct);

        Some(Self {
            key: SeriesKey::of(series),
            x_min: date_to_plot_x(first.date),
            x_max: date_to_plot_x(last.date),
            y_min,
            y_max,
        })
    }
}

/// Row whose date is closest to plot coordinate `x`.
pub fn nearest_row(rows: &[SignalRow], x: f64) -> Option<&SignalRow> {
    let target = plot_x_to_date(x)?;
    let idx = rows.partition_point(|row| row.date < target);
    let after = rows.get(idx);
    let before = idx.checked_sub(1).and_then(|i| rows.get(i));
    match (before, after) {
        (Some(b), Some(a)) => {
            if (target - b.date) <= (a.date - target) {
                Some(b)
            } else {
                Some(a)
            }
        }
        (b, a) => b.or(a),
    }
}

/// Hover text: the nearest row's date and the value of the series under the pointer.
pub fn hover_label(rows: &[SignalRow], series_name: &str, pointer: &PlotPoint) -> String {
    let Some(row) = nearest_row(rows, pointer.x) else {
        return String::new();
    };
    let date = format_date(row.date);
    if series_name.is_empty() {
        format!("{}\n{}", date, format_price(pointer.y))
    } else {
        format!("{}\n{}: {}", date, series_name, format_price(pointer.y))
    }
}

#[derive(Default)]
pub struct PlotView {
    cache: Option<PlotCache>,
}

impl PlotView {
    pub fn new() -> Self {
        Self { cache: None }
    }

    pub fn clear_cache(&mut self) {
        self.cache = None;
    }

    fn calculate_plot_data(&mut self, series: &SignalSeries) -> Option<PlotCache> {
        let key = SeriesKey::of(series);
        if let Some(cache) = self.cache {
            if cache.key == key {
                return Some(cache);
            }
        }
        self.cache = PlotCache::from_series(series);
        self.cache
    }

    pub fn show_signal_plot(
        &mut self,
        ui: &mut egui::Ui,
        series: &SignalSeries,
        visibility: &PlotVisibility,
        selected_date: Option<NaiveDate>,
    ) {
        let Some(cache) = self.calculate_plot_data(series) else {
            return;
        };

        let legend = Legend::default().position(Corner::LeftTop);

        Plot::new("signal_plot")
            .legend(legend)
            .width(PLOT_CONFIG.plot_width)
            .height(PLOT_CONFIG.plot_height)
            .custom_x_axes(vec![create_x_axis()])
            .custom_y_axes(vec![create_y_axis()])
            .label_formatter(|name, value| hover_label(&series.rows, name, value))
            // Initial view covers the data; zoom and drag stay free afterwards
            .include_x(cache.x_min)
            .include_x(cache.x_max)
            .include_y(cache.y_min)
            .include_y(cache.y_max)
            .show(ui, |plot_ui| {
                let ctx = LayerContext {
                    series,
                    visibility,
                    selected_date,
                };

                // Back to front
                let layers: Vec<Box<dyn PlotLayer>> = vec![
                    Box::new(ClosePriceLayer),
                    Box::new(MovingAverageLayer),
                    Box::new(EntryExitLayer),
                    Box::new(SelectionLayer),
                ];

                for layer in layers {
                    layer.render(plot_ui, &ctx);
                }
            });
    }
}

fn create_x_axis() -> AxisHints<'static> {
    AxisHints::new_x()
        .label(UI_TEXT.plot_x_axis)
        .formatter(|grid_mark, _range| {
            plot_x_to_date(grid_mark.value)
                .map(format_date)
                .unwrap_or_default()
        })
}

fn create_y_axis() -> AxisHints<'static> {
    AxisHints::new_y()
        .label(PLOT_CONFIG.y_axis_label)
        .formatter(|grid_mark, _range| format!("{:.2}", grid_mark.value))
        .placement(HPlacement::Left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricePoint;
    use crate::models::SignalDeriver;

    fn series(closes: &[f64]) -> SignalSeries {
        let start = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
        let points: Vec<PricePoint> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(start + chrono::Duration::days(2 * i as i64), close))
            .collect();
        SignalDeriver::new(StrategyParams::new(2, 3).unwrap()).derive(&points)
    }

    #[test]
    fn bounds_cover_closes_with_padding() {
        let s = series(&[10.0, 20.0, 15.0, 30.0]);
        let cache = PlotCache::from_series(&s).unwrap();
        assert_eq!(cache.x_min, date_to_plot_x(s.rows[0].date));
        assert_eq!(cache.x_max - cache.x_min, 6.0);
        assert!((cache.y_min - 9.0).abs() < 1e-9);
        assert!((cache.y_max - 31.0).abs() < 1e-9);
    }

    #[test]
    fn empty_series_has_no_bounds() {
        assert!(PlotCache::from_series(&series(&[])).is_none());
    }

    #[test]
    fn cache_is_reused_for_the_same_series() {
        let s = series(&[1.0, 2.0, 3.0]);
        let mut view = PlotView::new();
        let first = view.calculate_plot_data(&s).unwrap();
        assert_eq!(view.calculate_plot_data(&s), Some(first));

        let longer = series(&[1.0, 2.0, 3.0, 4.0]);
        assert_ne!(view.calculate_plot_data(&longer), Some(first));
        view.clear_cache();
        assert!(view.cache.is_none());
    }

    #[test]
    fn nearest_row_snaps_to_trading_days() {
        let s = series(&[1.0, 2.0, 3.0]);
        let x0 = date_to_plot_x(s.rows[0].date);
        // Rows are two days apart; one day after the first is a tie, which goes to the earlier row
        assert_eq!(nearest_row(&s.rows, x0 + 1.0).unwrap().close, 1.0);
        assert_eq!(nearest_row(&s.rows, x0 + 1.6).unwrap().close, 2.0);
        assert_eq!(nearest_row(&s.rows, x0 - 50.0).unwrap().close, 1.0);
        assert_eq!(nearest_row(&s.rows, x0 + 50.0).unwrap().close, 3.0);
        assert!(nearest_row(&[], x0).is_none());
    }

    #[test]
    fn hover_shows_date_and_price() {
        let s = series(&[1.0, 2.0, 3.0]);
        let pointer = PlotPoint::new(date_to_plot_x(s.rows[1].date), 2.5);
        assert_eq!(hover_label(&s.rows, "SMA2", &pointer), "2021-01-06\nSMA2: $2.50");
        assert_eq!(hover_label(&s.rows, "", &pointer), "2021-01-06\n$2.50");
    }
}
