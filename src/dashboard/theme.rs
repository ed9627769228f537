//! Dashboard theme and styling
//!
//! A [`Theme`] is built once at startup from the configured mode and handed
//! to every view. Nothing reads colours from globals.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

use crate::config::ThemeMode;
use crate::shared::Severity;
use crate::vision::ConfidenceTier;

/// Overlay fill alpha, resting and hovered
const TIER_FILL_ALPHA: u8 = 26;
const TIER_FILL_ALPHA_HOVER: u8 = 77;

/// Named colours of one theme variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    // Background colors
    pub background: Color32,
    pub paper: Color32,
    pub paper_raised: Color32,
    pub hover: Color32,

    // Accent colors
    pub primary: Color32,
    pub secondary: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,
    pub info: Color32,

    // Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub text_on_accent: Color32,

    pub border: Color32,
}

impl Palette {
    /// Blue and pink on light grey
    pub const LIGHT: Palette = Palette {
        background: Color32::from_rgb(245, 245, 245),
        paper: Color32::from_rgb(255, 255, 255),
        paper_raised: Color32::from_rgb(250, 250, 250),
        hover: Color32::from_rgb(232, 240, 254),

        primary: Color32::from_rgb(33, 150, 243),
        secondary: Color32::from_rgb(245, 0, 87),
        success: Color32::from_rgb(76, 175, 80),
        warning: Color32::from_rgb(255, 152, 0),
        error: Color32::from_rgb(244, 67, 54),
        info: Color32::from_rgb(33, 150, 243),

        text_primary: Color32::from_rgb(33, 33, 33),
        text_secondary: Color32::from_rgb(97, 97, 97),
        text_muted: Color32::from_rgb(158, 158, 158),
        text_on_accent: Color32::WHITE,

        border: Color32::from_rgb(224, 224, 224),
    };

    pub const DARK: Palette = Palette {
        background: Color32::from_rgb(18, 18, 24),
        paper: Color32::from_rgb(28, 28, 36),
        paper_raised: Color32::from_rgb(38, 38, 48),
        hover: Color32::from_rgb(48, 48, 60),

        primary: Color32::from_rgb(88, 166, 255),
        secondary: Color32::from_rgb(255, 64, 129),
        success: Color32::from_rgb(76, 175, 80),
        warning: Color32::from_rgb(255, 152, 0),
        error: Color32::from_rgb(244, 67, 54),
        info: Color32::from_rgb(88, 166, 255),

        text_primary: Color32::from_rgb(240, 240, 245),
        text_secondary: Color32::from_rgb(160, 160, 175),
        text_muted: Color32::from_rgb(100, 100, 115),
        text_on_accent: Color32::WHITE,

        border: Color32::from_rgb(50, 50, 65),
    };
}

/// Palette plus shape and spacing
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub mode: ThemeMode,
    pub palette: Palette,
    /// Corner radius of cards and widgets
    pub rounding: f32,
    /// Vertical gap between sections
    pub section_spacing: f32,
    /// Inner margin of cards
    pub card_margin: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            palette: Palette::LIGHT,
            rounding: 8.0,
            section_spacing: 16.0,
            card_margin: 16.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            palette: Palette::DARK,
            ..Self::light()
        }
    }

    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    /// Install this theme into egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style: Style = (*ctx.style()).clone();
        let p = &self.palette;
        let rounding = Rounding::same(self.rounding * 0.75);

        // Configure visuals
        let mut visuals = match self.mode {
            ThemeMode::Light => Visuals::light(),
            ThemeMode::Dark => Visuals::dark(),
        };

        // Window and panel backgrounds
        visuals.window_fill = p.paper;
        visuals.panel_fill = p.background;
        visuals.faint_bg_color = p.paper_raised;
        visuals.extreme_bg_color = p.paper;
        visuals.override_text_color = Some(p.text_primary);

        // Widget colors
        visuals.widgets.noninteractive.bg_fill = p.paper;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, p.text_secondary);
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, p.border);
        visuals.widgets.noninteractive.rounding = rounding;

        visuals.widgets.inactive.bg_fill = p.paper_raised;
        visuals.widgets.inactive.weak_bg_fill = p.paper_raised;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, p.text_primary);
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, p.border);
        visuals.widgets.inactive.rounding = rounding;

        visuals.widgets.hovered.bg_fill = p.hover;
        visuals.widgets.hovered.weak_bg_fill = p.hover;
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, p.text_primary);
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, p.primary);
        visuals.widgets.hovered.rounding = rounding;

        visuals.widgets.active.bg_fill = p.primary;
        visuals.widgets.active.weak_bg_fill = p.primary;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, p.text_on_accent);
        visuals.widgets.active.rounding = rounding;

        visuals.widgets.open.bg_fill = p.hover;
        visuals.widgets.open.fg_stroke = Stroke::new(1.0, p.text_primary);
        visuals.widgets.open.rounding = rounding;

        // Selection and interaction
        visuals.selection.bg_fill = color_with_alpha(p.primary, 77); // ~0.3 alpha
        visuals.selection.stroke = Stroke::new(1.0, p.primary);
        visuals.hyperlink_color = p.primary;

        // Window appearance
        visuals.window_rounding = Rounding::same(self.rounding);
        visuals.window_shadow.blur = 8.0;
        visuals.window_stroke = Stroke::new(1.0, p.border);
        visuals.popup_shadow.blur = 4.0;
        visuals.menu_rounding = rounding;

        style.visuals = visuals;

        // Spacing
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
        style.spacing.window_margin = egui::Margin::same(self.card_margin);

        style.text_styles = [
            (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
            (TextStyle::Body, FontId::new(15.0, FontFamily::Proportional)),
            (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
            (TextStyle::Button, FontId::new(15.0, FontFamily::Proportional)),
            (TextStyle::Heading, FontId::new(22.0, FontFamily::Proportional)),
        ]
        .into();

        ctx.set_style(style);
    }

    /// Outline colour of a confidence tier
    pub fn tier_color(&self, tier: ConfidenceTier) -> Color32 {
        let [r, g, b] = tier.rgb();
        Color32::from_rgb(r, g, b)
    }

    /// Translucent overlay fill, stronger when hovered
    pub fn tier_fill(&self, tier: ConfidenceTier, hovered: bool) -> Color32 {
        let alpha = if hovered {
            TIER_FILL_ALPHA_HOVER
        } else {
            TIER_FILL_ALPHA
        };
        color_with_alpha(self.tier_color(tier), alpha)
    }

    pub fn severity_color(&self, severity: Severity) -> Color32 {
        match severity {
            Severity::Success => self.palette.success,
            Severity::Info => self.palette.info,
            Severity::Warning => self.palette.warning,
            Severity::Error => self.palette.error,
        }
    }

    /// Frame for a content card
    pub fn card_frame(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.palette.paper)
            .stroke(Stroke::new(1.0, self.palette.border))
            .rounding(Rounding::same(self.rounding))
            .inner_margin(self.card_margin)
    }
}

/// Helper to create a color with modified alpha
pub fn color_with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}
