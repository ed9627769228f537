//! Processed image with word box overlays

use egui::{Rect, RichText, Rounding, Sense, Stroke};

use crate::api::OcrResult;
use crate::dashboard::components::outlined_chip;
use crate::dashboard::state::{ProcessedImage, ResultViewState, UiAction};
use crate::dashboard::theme::{color_with_alpha, Theme};
use crate::storage::ExportKind;
use crate::vision::{layout_boxes, ConfidenceTier};

/// Height of the scrollable image viewport
const VIEWPORT_HEIGHT: f32 = 500.0;

pub fn render_visualization_tab(
    ui: &mut egui::Ui,
    theme: &Theme,
    result: &OcrResult,
    view_state: &mut ResultViewState,
    actions: &mut Vec<UiAction>,
) {
    let (size, texture_image) = match &view_state.processed {
        ProcessedImage::Absent => {
            info_message(ui, theme, "No processed image available for visualization.");
            return;
        }
        ProcessedImage::Loading { .. } => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading processed image...");
            });
            return;
        }
        ProcessedImage::Failed(message) => {
            info_message(ui, theme, message);
            return;
        }
        ProcessedImage::Ready { decoded, .. } => (decoded.original_size, decoded),
    };

    // Upload once per image
    if view_state.texture.is_none() {
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [texture_image.size.0 as usize, texture_image.size.1 as usize],
            &texture_image.rgba,
        );
        view_state.texture = Some(ui.ctx().load_texture(
            "processed_image",
            color_image,
            egui::TextureOptions::LINEAR,
        ));
    }

    ui.horizontal(|ui| {
        ui.label(RichText::new("Text Detection Visualization").size(17.0).strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Download Annotated Image").clicked() {
                actions.push(UiAction::Export(ExportKind::AnnotatedImage));
            }
            ui.add_space(12.0);
            if ui
                .add_enabled(view_state.zoom.can_zoom_in(), egui::Button::new("+"))
                .on_hover_text("Zoom in")
                .clicked()
            {
                view_state.zoom.zoom_in();
            }
            ui.label(view_state.zoom.label());
            if ui
                .add_enabled(view_state.zoom.can_zoom_out(), egui::Button::new("-"))
                .on_hover_text("Zoom out")
                .clicked()
            {
                view_state.zoom.zoom_out();
            }
        });
    });
    ui.add_space(8.0);

    let Some(texture) = &view_state.texture else {
        return;
    };
    let zoom = view_state.zoom;
    let display_size = egui::vec2(size.0 as f32, size.1 as f32) * zoom.factor();

    egui::Frame::none()
        .stroke(Stroke::new(1.0, theme.palette.border))
        .rounding(Rounding::same(theme.rounding * 0.5))
        .show(ui, |ui| {
            egui::ScrollArea::both()
                .max_height(VIEWPORT_HEIGHT)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    let (image_rect, _) = ui.allocate_exact_size(display_size, Sense::hover());
                    ui.painter().image(
                        texture.id(),
                        image_rect,
                        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );

                    let overlay_id = ui.id().with("word_boxes");
                    for overlay in layout_boxes(result.overlay_boxes(), zoom) {
                        let box_rect = Rect::from_min_size(
                            image_rect.min + egui::vec2(overlay.x, overlay.y),
                            egui::vec2(overlay.width, overlay.height),
                        );
                        let response = ui
                            .interact(box_rect, overlay_id.with(overlay.index), Sense::hover())
                            .on_hover_text(overlay.tooltip.as_str());
                        let hovered = response.hovered();

                        ui.painter().rect(
                            box_rect,
                            Rounding::ZERO,
                            theme.tier_fill(overlay.tier, hovered),
                            Stroke::new(2.0, theme.tier_color(overlay.tier)),
                        );
                    }
                });
        });

    ui.add_space(theme.section_spacing);
    ui.horizontal_wrapped(|ui| {
        for tier in ConfidenceTier::ALL {
            outlined_chip(ui, tier.label(), theme.tier_color(tier));
        }
    });
}

fn info_message(ui: &mut egui::Ui, theme: &Theme, message: &str) {
    egui::Frame::none()
        .fill(color_with_alpha(theme.palette.info, 25))
        .rounding(Rounding::same(theme.rounding * 0.5))
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(message);
        });
}
