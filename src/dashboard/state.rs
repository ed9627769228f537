//! Dashboard view state management

use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::api::{OcrResult, ServiceHealth, SubmitError};
use crate::shared::SessionState;
use crate::storage::ExportKind;
use crate::vision::{decode_data_uri, decode_image, DecodedImage, ImageLocation, Zoom, MAX_TEXTURE_SIDE};

/// Tabs of the result viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultTab {
    #[default]
    Text,
    Visualization,
    Details,
    WordBoxes,
    Files,
}

impl ResultTab {
    pub const ALL: [ResultTab; 5] = [
        ResultTab::Text,
        ResultTab::Visualization,
        ResultTab::Details,
        ResultTab::WordBoxes,
        ResultTab::Files,
    ];

    /// Get the display name for this tab
    pub fn name(&self) -> &'static str {
        match self {
            ResultTab::Text => "Text",
            ResultTab::Visualization => "Visualization",
            ResultTab::Details => "Details",
            ResultTab::WordBoxes => "Word Boxes",
            ResultTab::Files => "Files",
        }
    }

    /// Whether this tab is shown for `result`
    pub fn is_available(&self, result: &OcrResult) -> bool {
        match self {
            ResultTab::Text | ResultTab::Visualization | ResultTab::Details => true,
            ResultTab::WordBoxes => result.has_word_boxes(),
            ResultTab::Files => result.batch().is_some(),
        }
    }

    pub fn available(result: &OcrResult) -> Vec<ResultTab> {
        Self::ALL
            .into_iter()
            .filter(|tab| tab.is_available(result))
            .collect()
    }
}

/// Processed image of the current result
#[derive(Debug, Clone, Default)]
pub enum ProcessedImage {
    /// The result has no processed image
    #[default]
    Absent,
    /// Waiting for the worker to fetch it for request `request`
    Loading { request: Uuid, location: String },
    /// Decoded and ready to upload as a texture
    Ready {
        bytes: Arc<[u8]>,
        decoded: DecodedImage,
    },
    /// Fetching or decoding failed
    Failed(String),
}

impl ProcessedImage {
    fn from_bytes(bytes: Vec<u8>) -> Self {
        match decode_image(&bytes, MAX_TEXTURE_SIDE) {
            Ok(decoded) => ProcessedImage::Ready {
                bytes: bytes.into(),
                decoded,
            },
            Err(e) => {
                warn!("Processed image could not be decoded: {:#}", e);
                ProcessedImage::Failed("The processed image could not be decoded".to_string())
            }
        }
    }
}

/// Result viewer state
pub struct ResultViewState {
    pub tab: ResultTab,
    pub zoom: Zoom,
    pub processed: ProcessedImage,
    /// Texture of `processed` once uploaded
    pub texture: Option<egui::TextureHandle>,
}

impl std::fmt::Debug for ResultViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultViewState")
            .field("tab", &self.tab)
            .field("zoom", &self.zoom)
            .field("processed", &self.processed)
            .field("has_texture", &self.texture.is_some())
            .finish()
    }
}

impl Default for ResultViewState {
    fn default() -> Self {
        Self {
            tab: ResultTab::Text,
            zoom: Zoom::default(),
            processed: ProcessedImage::Absent,
            texture: None,
        }
    }
}

impl ResultViewState {
    /// Reset for the result of request `request`. Returns a location the
    /// worker has to fetch, if any; inline images are decoded right away.
    pub fn begin(&mut self, result: &OcrResult, request: Uuid, zoom: Zoom) -> Option<String> {
        self.tab = ResultTab::Text;
        self.zoom = zoom;
        self.texture = None;

        let Some(location) = result.processed_image() else {
            self.processed = ProcessedImage::Absent;
            return None;
        };

        match ImageLocation::classify(location) {
            ImageLocation::Inline(uri) => {
                self.processed = match decode_data_uri(uri) {
                    Ok(bytes) => ProcessedImage::from_bytes(bytes),
                    Err(e) => {
                        warn!("Bad processed image data URI: {:#}", e);
                        ProcessedImage::Failed("The processed image could not be decoded".to_string())
                    }
                };
                None
            }
            ImageLocation::Remote(path) => {
                self.processed = ProcessedImage::Loading {
                    request,
                    location: path.to_string(),
                };
                Some(path.to_string())
            }
        }
    }

    /// Apply a fetched image; ignored unless it is the one being waited for.
    /// The request id must match too, since locations can repeat across
    /// results.
    pub fn image_arrived(
        &mut self,
        request: Uuid,
        location: &str,
        outcome: Result<Vec<u8>, SubmitError>,
    ) {
        let waiting = matches!(
            &self.processed,
            ProcessedImage::Loading { request: pending_request, location: pending }
                if *pending_request == request && pending == location
        );
        if !waiting {
            return;
        }

        self.texture = None;
        self.processed = match outcome {
            Ok(bytes) => ProcessedImage::from_bytes(bytes),
            Err(e) => {
                warn!("Processed image unavailable: {:?}", e);
                ProcessedImage::Failed(e.to_string())
            }
        };
    }

    /// Forget everything about the previous result
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Keep the selected tab valid for `result`
    pub fn ensure_tab(&mut self, result: &OcrResult) {
        if !self.tab.is_available(result) {
            self.tab = ResultTab::Text;
        }
    }
}

/// Upload panel state
#[derive(Default)]
pub struct UploadViewState {
    /// Preview texture of the first staged file
    pub preview_texture: Option<egui::TextureHandle>,
    /// Preview generation the texture was built from
    pub preview_generation: Option<u64>,
    /// Whether files are being dragged over the window
    pub drag_hover: bool,
}

impl std::fmt::Debug for UploadViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadViewState")
            .field("has_texture", &self.preview_texture.is_some())
            .field("preview_generation", &self.preview_generation)
            .field("drag_hover", &self.drag_hover)
            .finish()
    }
}

/// Reachability of the OCR service
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ServiceStatus {
    #[default]
    Unknown,
    Checking,
    Online(ServiceHealth),
    Offline(String),
}

impl ServiceStatus {
    pub fn from_outcome(outcome: Result<ServiceHealth, SubmitError>) -> Self {
        match outcome {
            Ok(health) if health.is_healthy() => ServiceStatus::Online(health),
            Ok(health) => ServiceStatus::Offline(format!("Status: {}", health.status)),
            Err(e) => ServiceStatus::Offline(e.to_string()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceStatus::Unknown => "Unknown",
            ServiceStatus::Checking => "Checking...",
            ServiceStatus::Online(_) => "Online",
            ServiceStatus::Offline(_) => "Offline",
        }
    }
}

/// Something a view asked for; handled by the app after rendering
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    PickFiles,
    RemoveFile(usize),
    ClearAll,
    Submit,
    Cancel,
    DismissError,
    DismissNotification,
    CopyText,
    Export(ExportKind),
    CheckHealth,
}

/// Overall dashboard state
#[derive(Debug, Default)]
pub struct DashboardState {
    pub session: SessionState,
    pub upload_view: UploadViewState,
    pub result_view: ResultViewState,
    pub service: ServiceStatus,
    /// Queued by views during this frame
    pub actions: Vec<UiAction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use image::{ImageFormat, Rgba, RgbaImage};
    use serde_json::json;
    use std::io::Cursor;

    fn png() -> Vec<u8> {
        let image = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn result(value: serde_json::Value) -> OcrResult {
        OcrResult::from_value(value).unwrap()
    }

    #[test]
    fn test_available_tabs() {
        let plain = result(json!({"success": true, "text": "a"}));
        assert_eq!(
            ResultTab::available(&plain),
            vec![ResultTab::Text, ResultTab::Visualization, ResultTab::Details]
        );

        let boxed = result(json!({
            "success": true,
            "word_boxes": [{"x": 1, "y": 1, "width": 2, "height": 2, "text": "a", "confidence": 90}]
        }));
        assert!(ResultTab::available(&boxed).contains(&ResultTab::WordBoxes));

        let empty_boxes = result(json!({"success": true, "word_boxes": []}));
        assert!(!ResultTab::WordBoxes.is_available(&empty_boxes));

        let batch = result(json!({"success": true, "results": []}));
        assert!(ResultTab::Files.is_available(&batch));
    }

    #[test]
    fn test_begin_resets_view() {
        let mut view = ResultViewState {
            tab: ResultTab::Details,
            zoom: Zoom::new(2.0),
            ..Default::default()
        };
        let fetch = view.begin(&result(json!({"success": true})), Uuid::new_v4(), Zoom::default());
        assert!(fetch.is_none());
        assert_eq!(view.tab, ResultTab::Text);
        assert_eq!(view.zoom, Zoom::default());
        assert!(matches!(view.processed, ProcessedImage::Absent));
    }

    #[test]
    fn test_inline_image_decodes_without_fetch() {
        let uri = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png())
        );
        let mut view = ResultViewState::default();
        let fetch = view.begin(
            &result(json!({"success": true, "processed_image": uri})),
            Uuid::new_v4(),
            Zoom::default(),
        );
        assert!(fetch.is_none());
        match &view.processed {
            ProcessedImage::Ready { decoded, .. } => assert_eq!(decoded.original_size, (3, 2)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_remote_image_is_fetched_once() {
        let mut view = ResultViewState::default();
        let request = Uuid::new_v4();
        let fetch = view.begin(
            &result(json!({"success": true, "processed_image": "/static/p.png"})),
            request,
            Zoom::default(),
        );
        assert_eq!(fetch.as_deref(), Some("/static/p.png"));

        // A different location is not what we are waiting for
        view.image_arrived(request, "/static/other.png", Ok(png()));
        assert!(matches!(view.processed, ProcessedImage::Loading { .. }));

        view.image_arrived(request, "/static/p.png", Ok(png()));
        assert!(matches!(view.processed, ProcessedImage::Ready { .. }));
    }

    #[test]
    fn test_late_fetch_for_previous_result_is_ignored() {
        let mut view = ResultViewState::default();
        let previous = Uuid::new_v4();
        let current = Uuid::new_v4();
        let page = json!({"success": true, "processed_image": "/static/latest.png"});

        view.begin(&result(page.clone()), previous, Zoom::default());
        view.begin(&result(page), current, Zoom::default());

        // Same path, but fetched for the earlier request
        view.image_arrived(previous, "/static/latest.png", Ok(png()));
        match &view.processed {
            ProcessedImage::Loading { request, .. } => assert_eq!(*request, current),
            other => panic!("unexpected {:?}", other),
        }

        view.image_arrived(current, "/static/latest.png", Ok(png()));
        assert!(matches!(view.processed, ProcessedImage::Ready { .. }));
    }

    #[test]
    fn test_failed_fetch_is_reported() {
        let mut view = ResultViewState::default();
        let request = Uuid::new_v4();
        view.begin(
            &result(json!({"success": true, "processed_image": "/p.png"})),
            request,
            Zoom::default(),
        );
        view.image_arrived(request, "/p.png", Err(SubmitError::Transport("refused".into())));
        match &view.processed {
            ProcessedImage::Failed(message) => {
                assert_eq!(message, "Could not reach the OCR service")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_service_status_from_outcome() {
        let healthy = ServiceHealth {
            status: "healthy".into(),
            service: None,
        };
        assert!(matches!(
            ServiceStatus::from_outcome(Ok(healthy)),
            ServiceStatus::Online(_)
        ));
        assert_eq!(
            ServiceStatus::from_outcome(Err(SubmitError::Timeout(5))).label(),
            "Offline"
        );
    }
}
