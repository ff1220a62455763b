//! Plot visualization configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    pub close_price_color: Color32,
    pub short_sma_color: Color32,
    pub long_sma_color: Color32,
    pub entry_color: Color32,
    pub exit_color: Color32,
    pub close_line_width: f32,
    pub sma_line_width: f32,
    /// Radius of entry/exit markers
    pub marker_radius: f32,
    /// Chart size in logical pixels
    pub plot_width: f32,
    pub plot_height: f32,
    /// Fraction of the price range added above and below the data
    pub y_padding_pct: f64,
    pub y_axis_label: &'static str,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    close_price_color: Color32::LIGHT_GRAY,
    short_sma_color: Color32::from_rgb(31, 119, 180), // Blue
    long_sma_color: Color32::from_rgb(255, 127, 14),  // Orange
    entry_color: Color32::from_rgb(0, 200, 0),         // Green
    exit_color: Color32::from_rgb(200, 0, 0),          // Red
    close_line_width: 1.5,
    sma_line_width: 2.0,
    marker_radius: 5.0,
    plot_width: 1000.0,
    plot_height: 400.0,
    y_padding_pct: 0.05,
    y_axis_label: "Price in $",
};
