//! Staged uploads
//!
//! Holds the ordered list of images waiting to be sent and the preview of the
//! first one. Decides whether a submission is a single-image or a batch
//! request.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::vision::{decode_image, DecodedImage};

/// File extensions the service accepts
pub const ACCEPTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "tiff"];

/// Longest preview side; the preview is displayed much smaller anyway
const PREVIEW_MAX_SIDE: u32 = 1024;

/// Whether a file name carries one of the accepted extensions
pub fn is_accepted(name: &str) -> bool {
    extension_of(name)
        .map(|ext| ACCEPTED_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(&ext)))
        .unwrap_or(false)
}

/// MIME type sent with the multipart part
pub fn mime_for(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("bmp") => "image/bmp",
        Some("gif") => "image/gif",
        Some("tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// An image read into memory and waiting to be submitted
#[derive(Clone)]
pub struct StagedFile {
    name: String,
    path: Option<PathBuf>,
    bytes: Arc<[u8]>,
}

impl std::fmt::Debug for StagedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagedFile")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

impl StagedFile {
    /// Read a file from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            path: Some(path.to_path_buf()),
            bytes: bytes.into(),
        })
    }

    /// Wrap bytes that are already in memory (e.g. dropped without a path)
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            path: None,
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size as shown in the file list, e.g. `12.50 KB`
    pub fn size_label(&self) -> String {
        format!("{:.2} KB", self.bytes.len() as f64 / 1024.0)
    }

    pub fn mime_type(&self) -> &'static str {
        mime_for(&self.name)
    }
}

/// Which endpoint a submission goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitKind {
    Single,
    Batch,
}

impl SubmitKind {
    /// Message used when the server gives no reason for a failure
    pub fn fallback_error(&self) -> &'static str {
        match self {
            SubmitKind::Single => "OCR processing failed",
            SubmitKind::Batch => "Batch processing failed",
        }
    }
}

/// A planned submission
#[derive(Debug, Clone)]
pub enum SubmitRequest {
    Single(StagedFile),
    Batch(Vec<StagedFile>),
}

impl SubmitRequest {
    pub fn kind(&self) -> SubmitKind {
        match self {
            SubmitRequest::Single(_) => SubmitKind::Single,
            SubmitRequest::Batch(_) => SubmitKind::Batch,
        }
    }

    pub fn file_count(&self) -> usize {
        match self {
            SubmitRequest::Single(_) => 1,
            SubmitRequest::Batch(files) => files.len(),
        }
    }
}

/// Outcome of a staging attempt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageReport {
    /// Number of files now staged from this attempt
    pub staged: usize,
    /// Names of files that were skipped, with the reason
    pub rejected: Vec<(String, String)>,
}

/// Ordered list of staged files plus the preview of the first
#[derive(Debug, Default)]
pub struct UploadQueue {
    files: Vec<StagedFile>,
    preview: Option<DecodedImage>,
    /// Bumped whenever the preview changes so textures can be refreshed
    preview_generation: u64,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage files from disk, replacing the current list when at least one
    /// file is accepted.
    pub fn stage_paths(&mut self, paths: &[PathBuf]) -> StageReport {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for path in paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            if !is_accepted(&name) {
                debug!("Skipping {:?}: unsupported file type", path);
                rejected.push((name, "unsupported file type".to_string()));
                continue;
            }

            match StagedFile::from_path(path) {
                Ok(file) => accepted.push(file),
                Err(e) => {
                    warn!("Could not stage {:?}: {:#}", path, e);
                    rejected.push((name, "could not be read".to_string()));
                }
            }
        }

        self.replace_with(accepted, rejected)
    }

    /// Stage in-memory files, replacing the current list when at least one
    /// file is accepted.
    pub fn stage_files(&mut self, candidates: Vec<StagedFile>) -> StageReport {
        let (accepted, rejected): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|file| is_accepted(file.name()));

        let rejected = rejected
            .into_iter()
            .map(|file| (file.name, "unsupported file type".to_string()))
            .collect();
        self.replace_with(accepted, rejected)
    }

    fn replace_with(
        &mut self,
        accepted: Vec<StagedFile>,
        rejected: Vec<(String, String)>,
    ) -> StageReport {
        let staged = accepted.len();
        if staged > 0 {
            self.files = accepted;
            self.refresh_preview();
            info!("Staged {} file(s)", staged);
        }

        StageReport { staged, rejected }
    }

    /// Remove one file and re-derive the preview from the new first file
    pub fn remove(&mut self, index: usize) -> Option<StagedFile> {
        if index >= self.files.len() {
            return None;
        }
        let removed = self.files.remove(index);
        debug!("Removed staged file {}", removed.name());
        self.refresh_preview();
        Some(removed)
    }

    /// Drop every staged file and the preview
    pub fn clear(&mut self) {
        self.files.clear();
        self.refresh_preview();
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn preview(&self) -> Option<&DecodedImage> {
        self.preview.as_ref()
    }

    pub fn preview_generation(&self) -> u64 {
        self.preview_generation
    }

    /// Plan a submission: one file goes to the single endpoint, several go
    /// to the batch endpoint, none means there is nothing to send.
    pub fn submission(&self) -> Option<SubmitRequest> {
        match self.files.as_slice() {
            [] => None,
            [only] => Some(SubmitRequest::Single(only.clone())),
            many => Some(SubmitRequest::Batch(many.to_vec())),
        }
    }

    fn refresh_preview(&mut self) {
        self.preview = self.files.first().and_then(|first| {
            match decode_image(first.bytes(), PREVIEW_MAX_SIDE) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    warn!("No preview for {}: {:#}", first.name(), e);
                    None
                }
            }
        });
        self.preview_generation += 1;
    }
}
