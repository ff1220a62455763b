use eframe::egui::Color32;

pub use crate::ui::ui_text::{UI_TEXT, UiText};

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub subsection_heading: Color32,
    pub central_panel: Color32,
    pub side_panel: Color32,
    pub position_long: Color32,
    pub position_flat: Color32,
    pub selected_row: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Default, Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    pub side_panel_min_width: f32,
    /// Height of the scrollable entry/exit list
    pub transitions_list_height: f32,
}

/// Global UI configuration instance
pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::GRAY,     // This sets every label globally to this color
        heading: Color32::YELLOW, // Sets every heading
        subsection_heading: Color32::ORANGE,
        central_panel: Color32::from_rgb(20, 20, 24),
        side_panel: Color32::from_rgb(25, 25, 25),
        position_long: Color32::from_rgb(100, 200, 100),
        position_flat: Color32::from_rgb(170, 170, 170),
        selected_row: Color32::from_rgb(0, 255, 255),
    },
    side_panel_min_width: 220.0,
    transitions_list_height: 260.0,
};
