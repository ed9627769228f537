//! Small rounded label

use egui::{Color32, RichText, Rounding, Stroke};

use crate::dashboard::theme::{color_with_alpha, Theme};

/// Filled chip, e.g. the word count in the result header
pub fn chip(ui: &mut egui::Ui, theme: &Theme, text: impl Into<String>, color: Color32) {
    egui::Frame::none()
        .fill(color_with_alpha(color, 36))
        .rounding(Rounding::same(12.0))
        .inner_margin(egui::Margin::symmetric(10.0, 3.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text.into()).size(12.0).color(theme.palette.text_primary));
        });
}

/// Outlined chip in a single colour, used by the confidence legend
pub fn outlined_chip(ui: &mut egui::Ui, text: impl Into<String>, color: Color32) {
    egui::Frame::none()
        .stroke(Stroke::new(1.0, color))
        .rounding(Rounding::same(12.0))
        .inner_margin(egui::Margin::symmetric(10.0, 3.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text.into()).size(12.0).color(color));
        });
}
