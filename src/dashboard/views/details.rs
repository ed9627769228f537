//! Statistics and export tab

use egui::RichText;

use crate::api::OcrResult;
use crate::dashboard::state::UiAction;
use crate::dashboard::theme::Theme;
use crate::storage::ExportKind;

pub fn render_details_tab(
    ui: &mut egui::Ui,
    theme: &Theme,
    result: &OcrResult,
    actions: &mut Vec<UiAction>,
) {
    ui.columns(2, |columns| {
        columns[0].label(RichText::new("Statistics").size(17.0).strong());
        columns[0].add_space(8.0);
        egui::Grid::new("result_statistics")
            .num_columns(2)
            .spacing([24.0, 8.0])
            .show(&mut columns[0], |ui| {
                stat_row(ui, theme, "Word Count", result.word_count().to_string());
                stat_row(ui, theme, "Character Count", result.character_count().to_string());
                stat_row(ui, theme, "Detected Words", result.detected_words().to_string());
                stat_row(ui, theme, "Average Confidence", result.average_confidence_label());
            });

        columns[1].label(RichText::new("Export Options").size(17.0).strong());
        columns[1].add_space(8.0);
        columns[1].vertical(|ui| {
            let width = egui::vec2(180.0, 30.0);
            if ui.add(egui::Button::new("Download as Text").min_size(width)).clicked() {
                actions.push(UiAction::Export(ExportKind::Text));
            }
            if ui.add(egui::Button::new("Download as JSON").min_size(width)).clicked() {
                actions.push(UiAction::Export(ExportKind::Json));
            }
            if ui.add(egui::Button::new("Copy to Clipboard").min_size(width)).clicked() {
                actions.push(UiAction::CopyText);
            }
        });

        if let Some(timestamp) = result.timestamp() {
            columns[1].add_space(12.0);
            columns[1].label(
                RichText::new(format!("Processed at: {}", timestamp.display()))
                    .size(12.0)
                    .color(theme.palette.text_secondary),
            );
        }
    });
}

fn stat_row(ui: &mut egui::Ui, theme: &Theme, label: &str, value: String) {
    ui.label(RichText::new(label).color(theme.palette.text_secondary));
    ui.label(RichText::new(value).strong());
    ui.end_row();
}
