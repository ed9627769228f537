//! Application bar with title and service status

use egui::RichText;

use crate::dashboard::components::status_card::{CardStatus, StatusCard};
use crate::dashboard::state::{ServiceStatus, UiAction};
use crate::dashboard::theme::Theme;

/// Render the header bar
pub fn render_header(
    ui: &mut egui::Ui,
    theme: &Theme,
    service: &ServiceStatus,
    server_url: &str,
    actions: &mut Vec<UiAction>,
) {
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("OCR Scanner")
                .size(22.0)
                .color(theme.palette.primary)
                .strong(),
        );

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let checking = matches!(service, ServiceStatus::Checking);
            if ui
                .add_enabled(!checking, egui::Button::new("Check"))
                .on_hover_text("Query the service health endpoint")
                .clicked()
            {
                actions.push(UiAction::CheckHealth);
            }

            let (status, caption) = match service {
                ServiceStatus::Unknown => (CardStatus::Inactive, server_url.to_string()),
                ServiceStatus::Checking => (CardStatus::Warning, server_url.to_string()),
                ServiceStatus::Online(health) => (
                    CardStatus::Active,
                    health
                        .service
                        .clone()
                        .unwrap_or_else(|| server_url.to_string()),
                ),
                ServiceStatus::Offline(reason) => (CardStatus::Error, reason.clone()),
            };
            StatusCard::new("OCR Service", service.label(), status)
                .with_caption(caption)
                .show(ui, theme);
        });
    });
    ui.add_space(8.0);
}
