//! Response model of the OCR service
//!
//! The service answers with a loosely shaped JSON object. It is decoded into
//! [`OcrResponse`] with every optional field spelled out, while the raw value
//! is kept next to it so exports reproduce exactly what the server sent.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::vision::overlay::ConfidenceTier;

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Nested box geometry used by the detailed `boxes` records
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct BoundingBox {
    #[serde(default, deserialize_with = "null_as_default")]
    pub left: f32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top: f32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: f32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: f32,
}

/// One detected word with its position and recognition confidence
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WordBox {
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Recognition confidence, 0-100
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f32,
}

impl WordBox {
    /// Pixel rectangle as (x, y, width, height).
    ///
    /// Flat fields win over the nested `bounding_box`.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let nested = self.bounding_box.unwrap_or_default();
        (
            self.x.unwrap_or(nested.left),
            self.y.unwrap_or(nested.top),
            self.width.unwrap_or(nested.width),
            self.height.unwrap_or(nested.height),
        )
    }

    pub fn tier(&self) -> ConfidenceTier {
        ConfidenceTier::classify(self.confidence)
    }

    /// Hover text shown over the overlay rectangle
    pub fn tooltip(&self) -> String {
        format!("{} ({}% confidence)", self.text, format_confidence(self.confidence))
    }
}

/// Format a confidence without a trailing `.0` for whole numbers
pub fn format_confidence(confidence: f32) -> String {
    if confidence.fract() == 0.0 {
        format!("{:.0}", confidence)
    } else {
        format!("{:.1}", confidence)
    }
}

/// Completion time reported by the service
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Seconds (or milliseconds) since the Unix epoch
    Epoch(f64),
    /// ISO-8601 text, with or without an offset
    Text(String),
}

impl Timestamp {
    /// Values above this are taken to be milliseconds
    const MILLIS_THRESHOLD: f64 = 1e11;

    /// Convert to local time when the value can be understood
    pub fn to_local(&self) -> Option<DateTime<Local>> {
        match self {
            Timestamp::Epoch(value) => {
                let millis = if value.abs() > Self::MILLIS_THRESHOLD {
                    *value as i64
                } else {
                    (*value * 1000.0) as i64
                };
                Utc.timestamp_millis_opt(millis)
                    .single()
                    .map(|dt| dt.with_timezone(&Local))
            }
            Timestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Local))
                .ok()
                .or_else(|| {
                    // Python's isoformat() omits the offset
                    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                        .ok()
                        .and_then(|naive| Local.from_local_datetime(&naive).single())
                }),
        }
    }

    /// Human readable local time, or the raw value when it cannot be parsed
    pub fn display(&self) -> String {
        match self.to_local() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => match self {
                Timestamp::Text(text) => text.clone(),
                Timestamp::Epoch(value) => value.to_string(),
            },
        }
    }
}

/// Per-file outcome of a batch request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchItemStatus {
    Success,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl BatchItemStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BatchItemStatus::Success => "Success",
            BatchItemStatus::Failed => "Failed",
            BatchItemStatus::Unknown => "Unknown",
        }
    }
}

/// One file in a batch response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BatchItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub word_count: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: BatchItemStatus,
    #[serde(default)]
    pub error: Option<String>,
}

/// Decoded response body, every field optional as sent by the service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub word_count: Option<u64>,
    #[serde(default)]
    pub character_count: Option<u64>,
    #[serde(default)]
    pub word_boxes: Option<Vec<WordBox>>,
    #[serde(default)]
    pub boxes: Option<Vec<WordBox>>,
    #[serde(default)]
    pub processed_image: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub total_files: Option<u64>,
    #[serde(default)]
    pub processed: Option<u64>,
    #[serde(default)]
    pub failed: Option<u64>,
    #[serde(default)]
    pub results: Option<Vec<BatchItem>>,
}

/// Totals and per-file rows of a batch response
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub total_files: u64,
    pub processed: u64,
    pub failed: u64,
    pub items: Vec<BatchItem>,
}

/// A result as held by the UI: typed view plus the raw JSON
#[derive(Debug, Clone)]
pub struct OcrResult {
    response: OcrResponse,
    raw: Value,
    text: String,
    batch: Option<BatchSummary>,
}

impl OcrResult {
    /// Decode a response body that has already been parsed as JSON
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let response: OcrResponse = serde_json::from_value(raw.clone())?;

        let batch = response.results.as_ref().map(|items| {
            let processed = items
                .iter()
                .filter(|item| item.status == BatchItemStatus::Success)
                .count() as u64;
            let failed = items
                .iter()
                .filter(|item| item.status == BatchItemStatus::Failed)
                .count() as u64;
            BatchSummary {
                total_files: response.total_files.unwrap_or(items.len() as u64),
                processed: response.processed.unwrap_or(processed),
                failed: response.failed.unwrap_or(failed),
                items: items.clone(),
            }
        });

        let text = match (&response.text, &batch) {
            (Some(text), _) => text.clone(),
            (None, Some(batch)) => combine_batch_text(&batch.items),
            (None, None) => String::new(),
        };

        Ok(Self {
            response,
            raw,
            text,
            batch,
        })
    }

    pub fn response(&self) -> &OcrResponse {
        &self.response
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Text shown and exported; empty when the service sent none
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the text view should warn that nothing was detected
    pub fn is_text_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Word count exactly as reported by the service
    pub fn word_count(&self) -> u64 {
        self.response.word_count.unwrap_or(0)
    }

    /// Character count exactly as reported by the service
    pub fn character_count(&self) -> u64 {
        self.response.character_count.unwrap_or(0)
    }

    /// Boxes drawn on the visualization: `word_boxes`, else `boxes`
    pub fn overlay_boxes(&self) -> &[WordBox] {
        self.response
            .word_boxes
            .as_deref()
            .or(self.response.boxes.as_deref())
            .unwrap_or(&[])
    }

    /// Boxes behind the statistics; only the detailed `boxes` records count
    pub fn detail_boxes(&self) -> &[WordBox] {
        self.response.boxes.as_deref().unwrap_or(&[])
    }

    /// Whether the raw word box tab has anything to show
    pub fn has_word_boxes(&self) -> bool {
        self.response
            .word_boxes
            .as_ref()
            .map(|boxes| !boxes.is_empty())
            .unwrap_or(false)
    }

    pub fn detected_words(&self) -> usize {
        self.detail_boxes().len()
    }

    /// Arithmetic mean of the detail box confidences
    pub fn average_confidence(&self) -> Option<f64> {
        let boxes = self.detail_boxes();
        if boxes.is_empty() {
            return None;
        }
        let sum: f64 = boxes.iter().map(|b| b.confidence as f64).sum();
        Some(sum / boxes.len() as f64)
    }

    /// Average confidence as displayed, e.g. `70.0%` or `N/A`
    pub fn average_confidence_label(&self) -> String {
        match self.average_confidence() {
            Some(average) => format!("{:.1}%", average),
            None => "N/A".to_string(),
        }
    }

    pub fn processed_image(&self) -> Option<&str> {
        self.response
            .processed_image
            .as_deref()
            .filter(|location| !location.trim().is_empty())
    }

    pub fn original_filename(&self) -> Option<&str> {
        self.response.original_filename.as_deref()
    }

    pub fn timestamp(&self) -> Option<&Timestamp> {
        self.response.timestamp.as_ref()
    }

    pub fn batch(&self) -> Option<&BatchSummary> {
        self.batch.as_ref()
    }

    /// The whole response, pretty printed with two-space indentation
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.raw)
    }

    /// The raw `word_boxes` array, pretty printed
    pub fn word_boxes_json(&self) -> Option<String> {
        self.raw
            .get("word_boxes")
            .and_then(|boxes| serde_json::to_string_pretty(boxes).ok())
    }
}

fn combine_batch_text(items: &[BatchItem]) -> String {
    items
        .iter()
        .filter(|item| item.status == BatchItemStatus::Success)
        .map(|item| {
            format!(
                "--- {} ---\n{}",
                item.filename,
                item.text.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(value: Value) -> OcrResult {
        OcrResult::from_value(value).unwrap()
    }

    #[test]
    fn test_average_confidence_of_two_boxes() {
        let r = result(json!({
            "success": true,
            "text": "a b",
            "boxes": [{"confidence": 90}, {"confidence": 50}]
        }));
        assert_eq!(r.average_confidence_label(), "70.0%");
        assert_eq!(r.detected_words(), 2);
    }

    #[test]
    fn test_average_confidence_without_boxes() {
        let empty = result(json!({"success": true, "text": "", "boxes": []}));
        assert_eq!(empty.average_confidence_label(), "N/A");

        let absent = result(json!({"success": true, "text": ""}));
        assert_eq!(absent.average_confidence_label(), "N/A");
        assert_eq!(absent.detected_words(), 0);
    }

    #[test]
    fn test_counts_are_not_recomputed() {
        let r = result(json!({
            "success": true,
            "text": "Hello world",
            "word_count": 7,
            "character_count": 3
        }));
        assert_eq!(r.text(), "Hello world");
        assert_eq!(r.word_count(), 7);
        assert_eq!(r.character_count(), 3);
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let r = result(json!({"success": true}));
        assert_eq!(r.word_count(), 0);
        assert_eq!(r.character_count(), 0);
        assert!(r.is_text_blank());
    }

    #[test]
    fn test_whitespace_text_is_blank() {
        let r = result(json!({"success": true, "text": "  \n\t "}));
        assert!(r.is_text_blank());
        let r = result(json!({"success": true, "text": " x "}));
        assert!(!r.is_text_blank());
    }

    #[test]
    fn test_overlay_and_detail_box_precedence() {
        let r = result(json!({
            "success": true,
            "boxes": [
                {"text": "a", "confidence": 61, "bounding_box": {"left": 1, "top": 2, "width": 3, "height": 4}},
                {"text": "b", "confidence": 70, "bounding_box": {"left": 1, "top": 2, "width": 3, "height": 4}}
            ],
            "word_boxes": [{"text": "a", "confidence": 61, "x": 10, "y": 20, "width": 30, "height": 40}]
        }));
        assert_eq!(r.overlay_boxes().len(), 1);
        assert_eq!(r.detail_boxes().len(), 2);
        assert!(r.has_word_boxes());

        let only_boxes = result(json!({
            "success": true,
            "boxes": [{"text": "a", "confidence": 61}]
        }));
        assert_eq!(only_boxes.overlay_boxes().len(), 1);
        assert_eq!(only_boxes.detail_boxes().len(), 1);
        assert!(!only_boxes.has_word_boxes());
    }

    #[test]
    fn test_word_boxes_alone_do_not_feed_statistics() {
        let r = result(json!({
            "success": true,
            "text": "hi",
            "word_boxes": [{"text": "hi", "confidence": 90, "x": 1, "y": 2, "width": 3, "height": 4}]
        }));
        assert_eq!(r.overlay_boxes().len(), 1);
        assert!(r.has_word_boxes());
        assert_eq!(r.detected_words(), 0);
        assert_eq!(r.average_confidence(), None);
        assert_eq!(r.average_confidence_label(), "N/A");
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let r = result(json!({
            "success": true,
            "text": "hi",
            "word_boxes": [
                {"text": null, "confidence": 90, "x": 1, "y": 2, "width": 3, "height": 4},
                {"text": "hi", "confidence": null, "bounding_box": {"left": null, "top": 2, "width": 3, "height": 4}}
            ]
        }));
        assert_eq!(r.text(), "hi");
        let boxes = r.overlay_boxes();
        assert_eq!(boxes[0].text, "");
        assert_eq!(boxes[0].confidence, 90.0);
        assert_eq!(boxes[1].confidence, 0.0);
        assert_eq!(boxes[1].rect(), (0.0, 2.0, 3.0, 4.0));

        let batch = result(json!({
            "success": null,
            "results": [{"filename": null, "status": null, "text": null}]
        }));
        assert!(!batch.response().success);
        let item = &batch.batch().unwrap().items[0];
        assert_eq!(item.filename, "");
        assert_eq!(item.status, BatchItemStatus::Unknown);
    }

    #[test]
    fn test_box_rect_prefers_flat_fields() {
        let flat = WordBox {
            x: Some(10.0),
            y: Some(20.0),
            width: Some(30.0),
            height: Some(40.0),
            bounding_box: Some(BoundingBox {
                left: 1.0,
                top: 2.0,
                width: 3.0,
                height: 4.0,
            }),
            ..Default::default()
        };
        assert_eq!(flat.rect(), (10.0, 20.0, 30.0, 40.0));

        let nested = WordBox {
            bounding_box: Some(BoundingBox {
                left: 1.0,
                top: 2.0,
                width: 3.0,
                height: 4.0,
            }),
            ..Default::default()
        };
        assert_eq!(nested.rect(), (1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_tooltip_text() {
        let word = WordBox {
            text: "Invoice".to_string(),
            confidence: 93.0,
            ..Default::default()
        };
        assert_eq!(word.tooltip(), "Invoice (93% confidence)");

        let fractional = WordBox {
            text: "Total".to_string(),
            confidence: 71.3,
            ..Default::default()
        };
        assert_eq!(fractional.tooltip(), "Total (71.3% confidence)");
    }

    #[test]
    fn test_batch_response_text_and_summary() {
        let r = result(json!({
            "success": true,
            "total_files": 3,
            "processed": 2,
            "failed": 1,
            "results": [
                {"filename": "a.png", "text": "first", "word_count": 1, "status": "success"},
                {"filename": "b.png", "error": "corrupt", "status": "failed"},
                {"filename": "c.png", "text": "third page", "word_count": 2, "status": "success"}
            ]
        }));
        let batch = r.batch().unwrap();
        assert_eq!(batch.total_files, 3);
        assert_eq!(batch.processed, 2);
        assert_eq!(batch.failed, 1);
        assert_eq!(batch.items[1].status, BatchItemStatus::Failed);
        assert_eq!(r.text(), "--- a.png ---\nfirst\n\n--- c.png ---\nthird page");
    }

    #[test]
    fn test_unknown_batch_status_still_decodes() {
        let r = result(json!({
            "success": true,
            "results": [{"filename": "a.png", "status": "queued"}]
        }));
        let batch = r.batch().unwrap();
        assert_eq!(batch.items[0].status, BatchItemStatus::Unknown);
        assert_eq!(batch.total_files, 1);
        assert_eq!(r.text(), "");
    }

    #[test]
    fn test_timestamp_forms() {
        let iso = Timestamp::Text("2026-01-03T12:34:56.123456".to_string());
        assert!(iso.to_local().is_some());

        let offset = Timestamp::Text("2026-01-03T12:34:56+00:00".to_string());
        assert!(offset.to_local().is_some());

        let seconds = Timestamp::Epoch(1_767_443_696.0);
        let millis = Timestamp::Epoch(1_767_443_696_000.0);
        assert_eq!(seconds.to_local(), millis.to_local());

        let garbage = Timestamp::Text("yesterday".to_string());
        assert_eq!(garbage.display(), "yesterday");
    }

    #[test]
    fn test_timestamp_decodes_from_either_shape() {
        let r = result(json!({"success": true, "timestamp": 1767443696}));
        assert!(matches!(r.timestamp(), Some(Timestamp::Epoch(_))));
        let r = result(json!({"success": true, "timestamp": "2026-01-03T12:34:56"}));
        assert!(matches!(r.timestamp(), Some(Timestamp::Text(_))));
    }

    #[test]
    fn test_pretty_json_keeps_unknown_fields() {
        let r = result(json!({"success": true, "text": "x", "engine": "tesseract"}));
        let json = r.to_json_pretty().unwrap();
        assert!(json.contains("\"engine\": \"tesseract\""));
        assert!(json.starts_with("{\n  \""));
    }

    #[test]
    fn test_blank_processed_image_is_absent() {
        let r = result(json!({"success": true, "processed_image": "  "}));
        assert!(r.processed_image().is_none());
    }
}
