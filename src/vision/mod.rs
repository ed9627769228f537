//! Vision layer
//!
//! Everything the client does with pixels: decoding previews and the
//! service's processed image, laying out word box overlays, and burning
//! those overlays into an exportable image. Recognition itself happens on
//! the server.

pub mod annotate;
pub mod decode;
pub mod overlay;

pub use annotate::annotate;
pub use decode::{decode_data_uri, decode_image, DecodedImage, ImageLocation, MAX_TEXTURE_SIDE};
pub use overlay::{layout_boxes, ConfidenceTier, OverlayBox, Zoom};
