//! OCR service API
//!
//! Typed response model, request error taxonomy, and the HTTP client that
//! talks to the recognition service.

pub mod client;
pub mod error;
pub mod types;

pub use client::{interpret_response, HttpOcrService, OcrService, ServiceHealth};
pub use error::SubmitError;
pub use types::{BatchItem, BatchItemStatus, BatchSummary, OcrResult, Timestamp, WordBox};
