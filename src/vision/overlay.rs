//! Word box overlay geometry
//!
//! Maps OCR word boxes onto the displayed processed image: confidence tiers
//! drive the colour, the zoom factor scales pixel coordinates.

use crate::api::types::WordBox;

/// Smallest zoom factor of the visualization
pub const MIN_ZOOM: f32 = 0.5;
/// Largest zoom factor of the visualization
pub const MAX_ZOOM: f32 = 3.0;
/// Increment applied by a single zoom action
pub const ZOOM_STEP: f32 = 0.25;

/// Confidence band of a word box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfidenceTier {
    /// Above 80
    High,
    /// 60 to 80 inclusive
    Medium,
    /// Below 60
    Low,
}

impl ConfidenceTier {
    pub const ALL: [ConfidenceTier; 3] = [
        ConfidenceTier::High,
        ConfidenceTier::Medium,
        ConfidenceTier::Low,
    ];

    /// Classify a 0-100 confidence; out of range values are clamped first
    pub fn classify(confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 100.0)
        };

        if confidence > 80.0 {
            ConfidenceTier::High
        } else if confidence >= 60.0 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    /// Legend label
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "High confidence (>80%)",
            ConfidenceTier::Medium => "Medium confidence (60-80%)",
            ConfidenceTier::Low => "Low confidence (<60%)",
        }
    }

    /// Outline colour used when rendering outside the UI (annotated exports)
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            ConfidenceTier::High => [76, 175, 80],
            ConfidenceTier::Medium => [255, 152, 0],
            ConfidenceTier::Low => [244, 67, 54],
        }
    }
}

/// Zoom factor of the visualization, always within [`MIN_ZOOM`, `MAX_ZOOM`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom(f32);

impl Default for Zoom {
    fn default() -> Self {
        Self(1.0)
    }
}

impl Zoom {
    pub fn new(factor: f32) -> Self {
        if factor.is_nan() {
            return Self::default();
        }
        Self(factor.clamp(MIN_ZOOM, MAX_ZOOM))
    }

    pub fn factor(&self) -> f32 {
        self.0
    }

    pub fn zoom_in(&mut self) {
        self.0 = (self.0 + ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.0 = (self.0 - ZOOM_STEP).max(MIN_ZOOM);
    }

    pub fn can_zoom_in(&self) -> bool {
        self.0 < MAX_ZOOM
    }

    pub fn can_zoom_out(&self) -> bool {
        self.0 > MIN_ZOOM
    }

    /// Label shown next to the zoom buttons, e.g. `Zoom: 1.25x`
    pub fn label(&self) -> String {
        format!("Zoom: {:.2}x", self.0)
    }
}

/// A word box positioned relative to the top-left corner of the zoomed image
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBox {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub tier: ConfidenceTier,
    pub tooltip: String,
}

/// Scale every box by the zoom factor.
///
/// Boxes with a non-positive width or height have nothing to draw and are
/// skipped.
pub fn layout_boxes(boxes: &[WordBox], zoom: Zoom) -> Vec<OverlayBox> {
    let factor = zoom.factor();
    boxes
        .iter()
        .enumerate()
        .filter_map(|(index, word)| {
            let (x, y, width, height) = word.rect();
            if width <= 0.0 || height <= 0.0 {
                return None;
            }
            Some(OverlayBox {
                index,
                x: x * factor,
                y: y * factor,
                width: width * factor,
                height: height * factor,
                tier: word.tier(),
                tooltip: word.tooltip(),
            })
        })
        .collect()
}
