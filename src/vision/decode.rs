//! Image decoding for previews and the processed image

use anyhow::{anyhow, bail, Context, Result};
use base64::Engine;
use image::imageops::FilterType;

/// Upper bound on texture side length handed to the GPU
pub const MAX_TEXTURE_SIDE: u32 = 4096;

/// Decoded RGBA pixels ready for upload as a texture
#[derive(Clone, PartialEq)]
pub struct DecodedImage {
    /// Size of the source image; overlay coordinates refer to this
    pub original_size: (u32, u32),
    /// Size of `rgba`, smaller than `original_size` when downscaled
    pub size: (u32, u32),
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("original_size", &self.original_size)
            .field("size", &self.size)
            .field("rgba", &format_args!("<{} bytes>", self.rgba.len()))
            .finish()
    }
}

/// Decode any supported format, downscaling so neither side exceeds `max_side`
pub fn decode_image(bytes: &[u8], max_side: u32) -> Result<DecodedImage> {
    let image = image::load_from_memory(bytes).context("Failed to decode image")?;
    let original_size = (image.width(), image.height());

    let image = if image.width() > max_side || image.height() > max_side {
        image.resize(max_side, max_side, FilterType::Triangle)
    } else {
        image
    };

    let rgba = image.to_rgba8();
    Ok(DecodedImage {
        original_size,
        size: (rgba.width(), rgba.height()),
        rgba: rgba.into_raw(),
    })
}

/// Where a `processed_image` value points to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLocation<'a> {
    /// Inline `data:` URI
    Inline(&'a str),
    /// Absolute URL or a path relative to the service
    Remote(&'a str),
}

impl<'a> ImageLocation<'a> {
    pub fn classify(location: &'a str) -> Self {
        let trimmed = location.trim();
        if trimmed
            .get(..5)
            .map(|scheme| scheme.eq_ignore_ascii_case("data:"))
            .unwrap_or(false)
        {
            ImageLocation::Inline(trimmed)
        } else {
            ImageLocation::Remote(trimmed)
        }
    }
}

/// Extract the bytes of a base64 `data:` URI
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .trim()
        .get(5..)
        .ok_or_else(|| anyhow!("Not a data URI"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| anyhow!("Data URI has no payload"))?;

    if !meta.to_ascii_lowercase().ends_with(";base64") {
        bail!("Only base64 data URIs are supported");
    }

    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(cleaned)
        .context("Invalid base64 in data URI")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_small_image_keeps_size() {
        let decoded = decode_image(&png_bytes(8, 4), MAX_TEXTURE_SIDE).unwrap();
        assert_eq!(decoded.original_size, (8, 4));
        assert_eq!(decoded.size, (8, 4));
        assert_eq!(decoded.rgba.len(), 8 * 4 * 4);
        assert_eq!(&decoded.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_downscales_large_image() {
        let decoded = decode_image(&png_bytes(200, 100), 50).unwrap();
        assert_eq!(decoded.original_size, (200, 100));
        assert_eq!(decoded.size, (50, 25));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_image(b"not an image", MAX_TEXTURE_SIDE).is_err());
    }

    #[test]
    fn test_data_uri_round_trip() {
        let png = png_bytes(2, 2);
        let uri = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&png)
        );
        assert_eq!(ImageLocation::classify(&uri), ImageLocation::Inline(&uri));
        assert_eq!(decode_data_uri(&uri).unwrap(), png);
    }

    #[test]
    fn test_data_uri_without_base64_is_rejected() {
        assert!(decode_data_uri("data:text/plain,hello").is_err());
        assert!(decode_data_uri("data:image/png;base64").is_err());
    }

    #[test]
    fn test_classify_remote_locations() {
        assert_eq!(
            ImageLocation::classify("https://ocr.example/p.png"),
            ImageLocation::Remote("https://ocr.example/p.png")
        );
        assert_eq!(
            ImageLocation::classify(" /static/p.png "),
            ImageLocation::Remote("/static/p.png")
        );
    }
}
