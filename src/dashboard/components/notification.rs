//! Toast for the current notification

use egui::{RichText, Rounding};

use crate::dashboard::state::UiAction;
use crate::dashboard::theme::Theme;
use crate::shared::Notification;

/// Render the toast at the bottom of the window
pub fn render_notification(
    ctx: &egui::Context,
    theme: &Theme,
    notification: &Notification,
    actions: &mut Vec<UiAction>,
) {
    let color = theme.severity_color(notification.severity);

    egui::Area::new(egui::Id::new("notification_toast"))
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(color)
                .rounding(Rounding::same(theme.rounding * 0.5))
                .inner_margin(egui::Margin::symmetric(16.0, 10.0))
                .shadow(ui.visuals().popup_shadow)
                .show(ui, |ui| {
                    ui.set_max_width(560.0);
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(&notification.message)
                                .color(theme.palette.text_on_accent),
                        );
                        ui.add_space(12.0);
                        let close = egui::Button::new(
                            RichText::new("x").color(theme.palette.text_on_accent),
                        )
                        .frame(false);
                        if ui.add(close).on_hover_text("Dismiss").clicked() {
                            actions.push(UiAction::DismissNotification);
                        }
                    });
                });
        });
}
