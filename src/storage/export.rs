//! Writing results to the export directory

use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::api::OcrResult;

/// What is being exported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Text,
    Json,
    AnnotatedImage,
}

impl ExportKind {
    fn prefix(&self) -> &'static str {
        match self {
            ExportKind::Text | ExportKind::Json => "ocr-result",
            ExportKind::AnnotatedImage => "ocr-annotated",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            ExportKind::Text => "txt",
            ExportKind::Json => "json",
            ExportKind::AnnotatedImage => "png",
        }
    }
}

/// e.g. `ocr-result-1700000000000.txt`
pub fn export_file_name(kind: ExportKind, epoch_millis: i64) -> String {
    format!("{}-{}.{}", kind.prefix(), epoch_millis, kind.extension())
}

/// Writes export files into one directory
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
    pretty_json: bool,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>, pretty_json: bool) -> Self {
        Self {
            dir: dir.into(),
            pretty_json,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the extracted text exactly as received
    pub fn write_text(&self, result: &OcrResult, epoch_millis: i64) -> Result<PathBuf> {
        let path = self.target(ExportKind::Text, epoch_millis)?;
        std::fs::write(&path, result.text())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Exported text to {:?}", path);
        Ok(path)
    }

    /// Write the whole response object
    pub fn write_json(&self, result: &OcrResult, epoch_millis: i64) -> Result<PathBuf> {
        let path = self.target(ExportKind::Json, epoch_millis)?;
        let serialized = if self.pretty_json {
            result.to_json_pretty()
        } else {
            serde_json::to_string(result.raw())
        };
        let content = serialized.context("Failed to serialize result")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Exported JSON to {:?}", path);
        Ok(path)
    }

    /// Write an annotated image as PNG
    pub fn write_annotated(&self, image: &RgbaImage, epoch_millis: i64) -> Result<PathBuf> {
        let path = self.target(ExportKind::AnnotatedImage, epoch_millis)?;
        image
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Exported annotated image to {:?}", path);
        Ok(path)
    }

    /// Path for a new export; never overwrites an existing file
    fn target(&self, kind: ExportKind, epoch_millis: i64) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.dir.join(export_file_name(kind, epoch_millis));
        if !path.exists() {
            return Ok(path);
        }

        let mut n = 1;
        loop {
            let candidate = self.dir.join(format!(
                "{}-{}-{}.{}",
                kind.prefix(),
                epoch_millis,
                n,
                kind.extension()
            ));
            if !candidate.exists() {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}
