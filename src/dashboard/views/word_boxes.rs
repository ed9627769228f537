//! Raw word box JSON tab

use egui::{RichText, TextStyle};

use crate::api::OcrResult;
use crate::dashboard::theme::Theme;

pub fn render_word_boxes_tab(ui: &mut egui::Ui, theme: &Theme, result: &OcrResult) {
    let count = result
        .response()
        .word_boxes
        .as_ref()
        .map(Vec::len)
        .unwrap_or(0);
    ui.label(
        RichText::new(format!("Detected Words ({}):", count))
            .size(17.0)
            .strong(),
    );
    ui.add_space(8.0);

    let Some(json) = result.word_boxes_json() else {
        ui.label(RichText::new("No word boxes in this result.").color(theme.palette.text_muted));
        return;
    };

    egui::Frame::none()
        .fill(theme.palette.paper_raised)
        .rounding(egui::Rounding::same(theme.rounding * 0.5))
        .inner_margin(12.0)
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .max_height(400.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new(json).text_style(TextStyle::Monospace));
                });
        });
}
