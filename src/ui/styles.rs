use eframe::egui::{Color32, RichText, Ui};

use crate::models::Signal;
use crate::ui::config::{UI_CONFIG, UI_TEXT};

/// Extension trait to add semantic styling methods directly to `egui::Ui`.
pub trait UiStyleExt {
    /// Renders small, gray text (good for labels like "Rows:").
    fn label_subdued(&mut self, text: impl Into<String>);

    /// Renders a "Label: Value" pair with consistent spacing and styling.
    /// The label is subdued, the value is colored.
    fn metric(&mut self, label: &str, value: &str, color: Color32);

    /// Renders a warning/info message (Yellow/Gold).
    fn label_warning(&mut self, text: impl Into<String>);

    /// Renders the held position as a colored LONG/FLAT badge.
    fn position_badge(&mut self, signal: Signal);
}

impl UiStyleExt for Ui {
    fn label_subdued(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(Color32::GRAY));
    }

    fn metric(&mut self, label: &str, value: &str, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0; // Tight spacing
            ui.label_subdued(format!("{}:", label));
            ui.label(RichText::new(value).small().color(color));
        });
    }

    fn label_warning(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(Color32::from_rgb(255, 215, 0)));
    }

    fn position_badge(&mut self, signal: Signal) {
        let (text, color) = match signal {
            Signal::Long => (UI_TEXT.label_position_long, UI_CONFIG.colors.position_long),
            Signal::Flat => (UI_TEXT.label_position_flat, UI_CONFIG.colors.position_flat),
        };
        self.metric(UI_TEXT.label_position, text, color);
    }
}
