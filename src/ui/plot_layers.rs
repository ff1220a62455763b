use chrono::NaiveDate;
use egui_plot::{Line, LineStyle, MarkerShape, PlotUi, Points, VLine};

use crate::config::PLOT_CONFIG;
use crate::models::{SignalRow, SignalSeries};
use crate::ui::app_state::{PlotSeries, PlotVisibility};
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::utils::time_utils::date_to_plot_x;

/// Context passed to every layer during rendering.
/// This prevents argument explosion.
pub struct LayerContext<'a> {
    pub series: &'a SignalSeries,
    pub visibility: &'a PlotVisibility,
    pub selected_date: Option<NaiveDate>,
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, ui: &mut PlotUi, ctx: &LayerContext);
}

fn row_point(row: &SignalRow) -> [f64; 2] {
    [date_to_plot_x(row.date), row.close]
}

pub fn close_points(rows: &[SignalRow]) -> Vec<[f64; 2]> {
    rows.iter().map(row_point).collect()
}

/// Contiguous runs of rows where `value` is defined.
/// A missing value ends the current run, so lines never bridge a gap.
pub fn defined_segments(
    rows: &[SignalRow],
    value: impl Fn(&SignalRow) -> Option<f64>,
) -> Vec<Vec<[f64; 2]>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for row in rows {
        match value(row) {
            Some(v) => current.push([date_to_plot_x(row.date), v]),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Markers sit on the close price of the row where the signal flipped.
pub fn marker_points<'a>(rows: impl Iterator<Item = &'a SignalRow>) -> Vec<[f64; 2]> {
    rows.map(row_point).collect()
}

// ============================================================================
// 1. CLOSE PRICE LAYER
// ============================================================================
pub struct ClosePriceLayer;

impl PlotLayer for ClosePriceLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if !ctx.visibility.is_visible(PlotSeries::ClosePrice) {
            return;
        }
        plot_ui.line(
            Line::new(UI_TEXT.label_close_price, close_points(&ctx.series.rows))
                .color(PLOT_CONFIG.close_price_color)
                .width(PLOT_CONFIG.close_line_width),
        );
    }
}

// ============================================================================
// 2. MOVING AVERAGE LAYER
// ============================================================================
pub struct MovingAverageLayer;

impl PlotLayer for MovingAverageLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if !ctx.visibility.is_visible(PlotSeries::MovingAverages) {
            return;
        }
        let params = ctx.series.params;
        let averages = [
            (
                params.short_label(),
                PLOT_CONFIG.short_sma_color,
                defined_segments(&ctx.series.rows, |row| row.short_sma),
            ),
            (
                params.long_label(),
                PLOT_CONFIG.long_sma_color,
                defined_segments(&ctx.series.rows, |row| row.long_sma),
            ),
        ];

        for (label, color, segments) in averages {
            // Same name for every segment so the legend shows one entry
            for segment in segments {
                plot_ui.line(
                    Line::new(label.as_str(), segment)
                        .color(color)
                        .width(PLOT_CONFIG.sma_line_width),
                );
            }
        }
    }
}

// ============================================================================
// 3. ENTRY / EXIT LAYER
// ============================================================================
pub struct EntryExitLayer;

impl PlotLayer for EntryExitLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if !ctx.visibility.is_visible(PlotSeries::Transitions) {
            return;
        }
        let markers = [
            (
                UI_TEXT.label_entries,
                PLOT_CONFIG.entry_color,
                MarkerShape::Up,
                marker_points(ctx.series.entries()),
            ),
            (
                UI_TEXT.label_exits,
                PLOT_CONFIG.exit_color,
                MarkerShape::Down,
                marker_points(ctx.series.exits()),
            ),
        ];

        for (label, color, shape, points) in markers {
            if points.is_empty() {
                continue;
            }
            plot_ui.points(
                Points::new(label, points)
                    .color(color)
                    .shape(shape)
                    .filled(true)
                    .radius(PLOT_CONFIG.marker_radius),
            );
        }
    }
}

// ============================================================================
// 4. SELECTION LAYER
// ============================================================================
pub struct SelectionLayer;

impl PlotLayer for SelectionLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let Some(date) = ctx.selected_date else {
            return;
        };
        plot_ui.vline(
            VLine::new(UI_TEXT.label_selection, date_to_plot_x(date))
                .color(UI_CONFIG.colors.selected_row)
                .width(1.0)
                .style(LineStyle::dashed_loose()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricePoint;
    use crate::models::{SignalDeriver, StrategyParams};

    fn series(closes: &[f64]) -> SignalSeries {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let points: Vec<PricePoint> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                PricePoint::new(start + chrono::Duration::days(i as i64), close)
            })
            .collect();
        SignalDeriver::new(StrategyParams::new(2, 4).unwrap()).derive(&points)
    }

    #[test]
    fn close_line_covers_every_row() {
        let s = series(&[1.0, 2.0, 3.0]);
        let points = close_points(&s.rows);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0][1], 1.0);
        assert_eq!(points[1][0] - points[0][0], 1.0);
    }

    #[test]
    fn averages_skip_the_warm_up() {
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let short = defined_segments(&s.rows, |row| row.short_sma);
        let long = defined_segments(&s.rows, |row| row.long_sma);
        assert_eq!(short.len(), 1);
        assert_eq!(short[0].len(), 5);
        assert_eq!(long[0].len(), 3);
        assert_eq!(long[0][0][1], 2.5);
    }

    #[test]
    fn gaps_split_segments() {
        let mut s = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        s.rows[3].short_sma = None;
        let segments = defined_segments(&s.rows, |row| row.short_sma);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[1].len(), 2);
    }

    #[test]
    fn markers_sit_on_the_close() {
        let s = series(&[5.0, 4.0, 3.0, 2.0, 1.0, 2.0, 6.0, 9.0, 1.0, 0.5, 0.25]);
        let entries = marker_points(s.entries());
        let exits = marker_points(s.exits());
        assert_eq!(entries.len(), s.entries().count());
        assert!(!entries.is_empty());
        assert!(!exits.is_empty());
        for (point, row) in entries.iter().zip(s.entries()) {
            assert_eq!(point[1], row.close);
        }
    }
}
