//! Upload panel - drop zone, preview and staged file list

use egui::{RichText, Rounding, Sense, Stroke};

use crate::dashboard::state::{UiAction, UploadViewState};
use crate::dashboard::theme::{color_with_alpha, Theme};
use crate::shared::SessionState;

/// Longest side of the preview image on screen
const PREVIEW_MAX_HEIGHT: f32 = 300.0;

/// Render the upload panel
pub fn render_upload_view(
    ui: &mut egui::Ui,
    theme: &Theme,
    session: &SessionState,
    view_state: &mut UploadViewState,
    actions: &mut Vec<UiAction>,
) {
    let disabled = session.is_busy();
    let uploads = session.uploads();

    theme.card_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());

        render_drop_zone(ui, theme, view_state.drag_hover, disabled, actions);

        // Keep the preview texture in step with the queue
        if view_state.preview_generation != Some(uploads.preview_generation()) {
            view_state.preview_texture = uploads.preview().map(|preview| {
                let color_image = egui::ColorImage::from_rgba_unmultiplied(
                    [preview.size.0 as usize, preview.size.1 as usize],
                    &preview.rgba,
                );
                ui.ctx()
                    .load_texture("upload_preview", color_image, egui::TextureOptions::LINEAR)
            });
            view_state.preview_generation = Some(uploads.preview_generation());
        }

        if let Some(texture) = &view_state.preview_texture {
            ui.add_space(theme.section_spacing);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("Preview:").strong());
                let tex_size = texture.size_vec2();
                let scale = (PREVIEW_MAX_HEIGHT / tex_size.y)
                    .min(ui.available_width() / tex_size.x)
                    .min(1.0);
                ui.image((texture.id(), tex_size * scale));
            });
        }

        if uploads.is_empty() {
            return;
        }

        ui.add_space(theme.section_spacing);
        ui.label(RichText::new(format!("Selected Files ({}):", uploads.len())).strong());
        ui.add_space(4.0);

        for (index, file) in uploads.files().iter().enumerate() {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(file.name());
                    ui.label(
                        RichText::new(file.size_label())
                            .size(12.0)
                            .color(theme.palette.text_secondary),
                    );
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add_enabled(!disabled, egui::Button::new("Remove"))
                        .clicked()
                    {
                        actions.push(UiAction::RemoveFile(index));
                    }
                });
            });
            ui.separator();
        }

        ui.add_space(theme.section_spacing);
        ui.horizontal(|ui| {
            let submit_label = if uploads.len() == 1 {
                "Extract Text"
            } else {
                "Process All"
            };
            let submit = egui::Button::new(
                RichText::new(submit_label).color(theme.palette.text_on_accent),
            )
            .fill(theme.palette.primary)
            .min_size(egui::vec2(150.0, 36.0));
            if ui.add_enabled(!disabled, submit).clicked() {
                actions.push(UiAction::Submit);
            }

            ui.add_space(8.0);

            let clear = egui::Button::new("Clear All").min_size(egui::vec2(100.0, 36.0));
            if ui.add_enabled(!disabled, clear).clicked() {
                actions.push(UiAction::ClearAll);
            }
        });

        if uploads.len() > 1 {
            ui.add_space(8.0);
            ui.label(
                RichText::new(format!(
                    "Processing {} files. This may take a moment...",
                    uploads.len()
                ))
                .size(13.0)
                .color(theme.palette.text_secondary),
            );
        }
    });
}

fn render_drop_zone(
    ui: &mut egui::Ui,
    theme: &Theme,
    drag_hover: bool,
    disabled: bool,
    actions: &mut Vec<UiAction>,
) {
    let border = if drag_hover && !disabled {
        theme.palette.primary
    } else {
        theme.palette.border
    };
    let fill = if drag_hover && !disabled {
        color_with_alpha(theme.palette.primary, 20)
    } else {
        theme.palette.paper_raised
    };

    let response = egui::Frame::none()
        .fill(fill)
        .stroke(Stroke::new(2.0, border))
        .rounding(Rounding::same(theme.rounding))
        .inner_margin(24.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                if disabled {
                    ui.set_opacity(0.5);
                }
                let headline = if drag_hover {
                    "Drop the images here..."
                } else {
                    "Drag & drop images here, or click to select"
                };
                ui.label(RichText::new(headline).size(18.0));
                ui.add_space(4.0);
                ui.label(
                    RichText::new("Supports PNG, JPG, JPEG, BMP, GIF, TIFF")
                        .size(13.0)
                        .color(theme.palette.text_secondary),
                );
                ui.add_space(8.0);
                let browse = egui::Button::new(
                    RichText::new("Browse Files").color(theme.palette.text_on_accent),
                )
                .fill(theme.palette.primary);
                if ui.add_enabled(!disabled, browse).clicked() {
                    actions.push(UiAction::PickFiles);
                }
            });
        })
        .response;

    if !disabled && response.interact(Sense::click()).clicked() {
        actions.push(UiAction::PickFiles);
    }
}
