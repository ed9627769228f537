//! Per-file outcomes of a batch request

use egui::RichText;
use egui_extras::{Column, TableBuilder};

use crate::api::{BatchItemStatus, OcrResult};
use crate::dashboard::components::status_card::{CardStatus, StatusCard};
use crate::dashboard::theme::Theme;

pub fn render_files_tab(ui: &mut egui::Ui, theme: &Theme, result: &OcrResult) {
    let Some(batch) = result.batch() else {
        return;
    };

    ui.horizontal(|ui| {
        StatusCard::new("Total Files", batch.total_files.to_string(), CardStatus::Inactive)
            .show(ui, theme);
        ui.add_space(12.0);
        StatusCard::new("Processed", batch.processed.to_string(), CardStatus::Active)
            .show(ui, theme);
        ui.add_space(12.0);
        let failed_status = if batch.failed > 0 {
            CardStatus::Error
        } else {
            CardStatus::Inactive
        };
        StatusCard::new("Failed", batch.failed.to_string(), failed_status).show(ui, theme);
    });
    ui.add_space(theme.section_spacing);

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::initial(220.0).resizable(true))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::remainder())
        .header(22.0, |mut header| {
            for title in ["File", "Status", "Words", "Error"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for item in &batch.items {
                body.row(22.0, |mut row| {
                    row.col(|ui| {
                        ui.label(item.filename.as_str());
                    });
                    row.col(|ui| {
                        let color = match item.status {
                            BatchItemStatus::Success => theme.palette.success,
                            BatchItemStatus::Failed => theme.palette.error,
                            BatchItemStatus::Unknown => theme.palette.text_muted,
                        };
                        ui.label(RichText::new(item.status.label()).color(color));
                    });
                    row.col(|ui| {
                        let words = item
                            .word_count
                            .map(|n| n.to_string())
                            .unwrap_or_else(|| "-".to_string());
                        ui.label(words);
                    });
                    row.col(|ui| {
                        ui.label(
                            RichText::new(item.error.as_deref().unwrap_or(""))
                                .color(theme.palette.error),
                        );
                    });
                });
            }
        });
}
