//! Status card component for displaying status information

use egui::{Color32, RichText, Rounding, Vec2};

use crate::dashboard::theme::Theme;

/// A card displaying status information
pub struct StatusCard {
    pub title: String,
    pub value: String,
    pub status: CardStatus,
    pub caption: Option<String>,
}

/// Status types for cards
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardStatus {
    Active,
    Inactive,
    Warning,
    Error,
}

impl CardStatus {
    pub fn color(&self, theme: &Theme) -> Color32 {
        match self {
            CardStatus::Active => theme.palette.success,
            CardStatus::Inactive => theme.palette.text_muted,
            CardStatus::Warning => theme.palette.warning,
            CardStatus::Error => theme.palette.error,
        }
    }
}

impl StatusCard {
    pub fn new(title: impl Into<String>, value: impl Into<String>, status: CardStatus) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            status,
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn show(&self, ui: &mut egui::Ui, theme: &Theme) {
        let color = self.status.color(theme);

        egui::Frame::none()
            .fill(theme.palette.paper_raised)
            .stroke(egui::Stroke::new(1.0, theme.palette.border))
            .rounding(Rounding::same(theme.rounding))
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .show(ui, |ui| {
                ui.set_min_width(120.0);

                ui.horizontal(|ui| {
                    // Status indicator dot
                    let dot_rect = egui::Rect::from_center_size(
                        ui.cursor().left_top() + Vec2::new(6.0, 10.0),
                        Vec2::splat(8.0),
                    );
                    ui.painter().circle_filled(dot_rect.center(), 4.0, color);
                    ui.add_space(16.0);

                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new(&self.title)
                                .size(11.0)
                                .color(theme.palette.text_muted),
                        );
                        ui.label(
                            RichText::new(&self.value)
                                .size(16.0)
                                .color(theme.palette.text_primary)
                                .strong(),
                        );
                        if let Some(caption) = &self.caption {
                            ui.label(RichText::new(caption).size(11.0).color(color));
                        }
                    });
                });
            });
    }
}
