//! Burn word box outlines into the processed image for export

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::api::types::WordBox;

/// Outline thickness in pixels
const OUTLINE_WIDTH: u32 = 2;

/// Decode `image_bytes` and draw every box as a tier-coloured outline
pub fn annotate(image_bytes: &[u8], boxes: &[WordBox]) -> Result<RgbaImage> {
    let mut canvas = image::load_from_memory(image_bytes)
        .context("Failed to decode processed image")?
        .to_rgba8();

    for word in boxes {
        let (x, y, width, height) = word.rect();
        let [r, g, b] = word.tier().rgb();
        let color = Rgba([r, g, b, 255]);

        for inset in 0..OUTLINE_WIDTH {
            let w = width.round() as i64 - 2 * inset as i64;
            let h = height.round() as i64 - 2 * inset as i64;
            if w < 1 || h < 1 {
                break;
            }
            let rect = Rect::at(x.round() as i32 + inset as i32, y.round() as i32 + inset as i32)
                .of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut canvas, rect, color);
        }
    }

    Ok(canvas)
}
