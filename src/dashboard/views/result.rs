//! Result card - header chips and tab switcher

use egui::RichText;

use crate::api::OcrResult;
use crate::dashboard::components::chip;
use crate::dashboard::state::{ResultTab, ResultViewState, UiAction};
use crate::dashboard::theme::Theme;

use super::{
    render_details_tab, render_files_tab, render_text_tab, render_visualization_tab,
    render_word_boxes_tab,
};

/// Render the result card
pub fn render_result_view(
    ui: &mut egui::Ui,
    theme: &Theme,
    result: &OcrResult,
    view_state: &mut ResultViewState,
    actions: &mut Vec<UiAction>,
) {
    view_state.ensure_tab(result);

    theme.card_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());

        ui.horizontal_wrapped(|ui| {
            ui.heading(RichText::new("OCR Results").strong());
            if let Some(filename) = result.original_filename() {
                ui.label(RichText::new(filename).color(theme.palette.text_secondary));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                chip(
                    ui,
                    theme,
                    format!("{} characters", result.character_count()),
                    theme.palette.secondary,
                );
                chip(
                    ui,
                    theme,
                    format!("{} words", result.word_count()),
                    theme.palette.primary,
                );
            });
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            for tab in ResultTab::available(result) {
                ui.selectable_value(&mut view_state.tab, tab, tab.name());
            }
        });
        ui.separator();
        ui.add_space(8.0);

        match view_state.tab {
            ResultTab::Text => render_text_tab(ui, theme, result, actions),
            ResultTab::Visualization => {
                render_visualization_tab(ui, theme, result, view_state, actions)
            }
            ResultTab::Details => render_details_tab(ui, theme, result, actions),
            ResultTab::WordBoxes => render_word_boxes_tab(ui, theme, result),
            ResultTab::Files => render_files_tab(ui, theme, result),
        }
    });
}
