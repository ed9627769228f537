//! Extracted text tab

use egui::{RichText, TextStyle};

use crate::api::OcrResult;
use crate::dashboard::state::UiAction;
use crate::dashboard::theme::{color_with_alpha, Theme};
use crate::storage::ExportKind;

pub const NO_TEXT_WARNING: &str = "No text was detected in the image. Try uploading a clearer image or adjusting the preprocessing settings.";

/// Blocks of the tab body, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSection {
    /// Read-only text box, shown even when empty
    TextBox,
    /// Warning that nothing was detected
    BlankWarning,
}

/// Body layout for `result`; the warning goes under the text box
pub fn text_sections(result: &OcrResult) -> Vec<TextSection> {
    let mut sections = vec![TextSection::TextBox];
    if result.is_text_blank() {
        sections.push(TextSection::BlankWarning);
    }
    sections
}

pub fn render_text_tab(
    ui: &mut egui::Ui,
    theme: &Theme,
    result: &OcrResult,
    actions: &mut Vec<UiAction>,
) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("Extracted Text").size(17.0).strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Download Text").clicked() {
                actions.push(UiAction::Export(ExportKind::Text));
            }
            if ui.button("Copy Text").clicked() {
                actions.push(UiAction::CopyText);
            }
        });
    });
    ui.add_space(8.0);

    for section in text_sections(result) {
        match section {
            TextSection::TextBox => render_text_box(ui, result),
            TextSection::BlankWarning => {
                ui.add_space(8.0);
                render_blank_warning(ui, theme);
            }
        }
    }
}

fn render_text_box(ui: &mut egui::Ui, result: &OcrResult) {
    // Read-only: a &str buffer cannot be edited
    let mut text = result.text();
    egui::ScrollArea::vertical()
        .max_height(400.0)
        .show(ui, |ui| {
            ui.add(
                egui::TextEdit::multiline(&mut text)
                    .font(TextStyle::Monospace)
                    .desired_width(f32::INFINITY)
                    .desired_rows(10),
            );
        });
}

fn render_blank_warning(ui: &mut egui::Ui, theme: &Theme) {
    egui::Frame::none()
        .fill(color_with_alpha(theme.palette.warning, 30))
        .stroke(egui::Stroke::new(1.0, theme.palette.warning))
        .rounding(egui::Rounding::same(theme.rounding * 0.5))
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(NO_TEXT_WARNING).color(theme.palette.text_primary));
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(text: &str) -> OcrResult {
        OcrResult::from_value(json!({"success": true, "text": text})).unwrap()
    }

    #[test]
    fn test_blank_text_keeps_text_box_above_warning() {
        assert_eq!(
            text_sections(&result("")),
            vec![TextSection::TextBox, TextSection::BlankWarning]
        );
        assert_eq!(
            text_sections(&result(" \n ")),
            vec![TextSection::TextBox, TextSection::BlankWarning]
        );
    }

    #[test]
    fn test_detected_text_has_no_warning() {
        assert_eq!(text_sections(&result("Hello world")), vec![TextSection::TextBox]);
    }
}
