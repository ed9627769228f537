//! HTTP client for the OCR service

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::SubmitError;
use super::types::OcrResult;
use crate::upload::{StagedFile, SubmitKind};
use crate::vision::{decode_data_uri, ImageLocation};

pub const SINGLE_ENDPOINT: &str = "/api/ocr";
pub const BATCH_ENDPOINT: &str = "/api/ocr-batch";
pub const HEALTH_ENDPOINT: &str = "/api/health";

/// Multipart field carrying the image of a single request
pub const SINGLE_FIELD: &str = "image";
/// Multipart field repeated once per image of a batch request
pub const BATCH_FIELD: &str = "images";

/// Shown when a 2xx response says `success: false` without a reason
pub const UNKNOWN_FALLBACK: &str = "Unknown error";

/// Answer of the health endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceHealth {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Operations the UI needs from an OCR backend
#[async_trait]
pub trait OcrService: Send + Sync {
    /// Recognize text in one image
    async fn recognize(&self, file: &StagedFile) -> Result<OcrResult, SubmitError>;

    /// Recognize text in several images with one request
    async fn recognize_batch(&self, files: &[StagedFile]) -> Result<OcrResult, SubmitError>;

    /// Query service liveness
    async fn health(&self) -> Result<ServiceHealth, SubmitError>;

    /// Load the bytes behind a `processed_image` value
    async fn fetch_image(&self, location: &str) -> Result<Vec<u8>, SubmitError>;
}

/// [`OcrService`] talking to the Flask-style HTTP API
pub struct HttpOcrService {
    http: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpOcrService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid server URL: {}", base_url))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, SubmitError> {
        self.base_url
            .join(path)
            .map_err(|e| SubmitError::Transport(format!("invalid URL for {}: {}", path, e)))
    }

    fn part(file: &StagedFile) -> Result<Part, SubmitError> {
        Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())
            .map_err(|e| SubmitError::Transport(e.to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> SubmitError {
        if err.is_timeout() {
            SubmitError::Timeout(self.timeout.as_secs())
        } else {
            SubmitError::Transport(err.to_string())
        }
    }

    async fn post_form(
        &self,
        path: &str,
        form: Form,
        kind: SubmitKind,
    ) -> Result<OcrResult, SubmitError> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        debug!("Response {} ({} bytes)", status, body.len());

        interpret_response(status, &body, kind.fallback_error())
    }
}

#[async_trait]
impl OcrService for HttpOcrService {
    async fn recognize(&self, file: &StagedFile) -> Result<OcrResult, SubmitError> {
        let form = Form::new().part(SINGLE_FIELD, Self::part(file)?);
        self.post_form(SINGLE_ENDPOINT, form, SubmitKind::Single).await
    }

    async fn recognize_batch(&self, files: &[StagedFile]) -> Result<OcrResult, SubmitError> {
        let mut form = Form::new();
        for file in files {
            form = form.part(BATCH_FIELD, Self::part(file)?);
        }
        self.post_form(BATCH_ENDPOINT, form, SubmitKind::Batch).await
    }

    async fn health(&self) -> Result<ServiceHealth, SubmitError> {
        let url = self.endpoint(HEALTH_ENDPOINT)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Server {
                status: status.as_u16(),
                message: format!("Health check returned {}", status),
            });
        }
        response
            .json::<ServiceHealth>()
            .await
            .map_err(|e| SubmitError::Decode(e.to_string()))
    }

    async fn fetch_image(&self, location: &str) -> Result<Vec<u8>, SubmitError> {
        match ImageLocation::classify(location) {
            ImageLocation::Inline(uri) => {
                decode_data_uri(uri).map_err(|e| SubmitError::Decode(format!("{:#}", e)))
            }
            ImageLocation::Remote(path) => {
                let url = self.endpoint(path)?;
                debug!("GET {}", url);
                let response = self
                    .http
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| self.transport_error(e))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(SubmitError::Server {
                        status: status.as_u16(),
                        message: format!("Processed image unavailable ({})", status),
                    });
                }
                let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
                Ok(bytes.to_vec())
            }
        }
    }
}

/// Turn a status code and body into a result or a user-facing error.
///
/// `fallback` is used when a failure carries no usable `error` field.
pub fn interpret_response(
    status: u16,
    body: &[u8],
    fallback: &str,
) -> Result<OcrResult, SubmitError> {
    let parsed = serde_json::from_slice::<Value>(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .as_ref()
            .and_then(error_field)
            .unwrap_or_else(|| fallback.to_string());
        warn!("OCR service returned {}: {}", status, message);
        return Err(SubmitError::Server { status, message });
    }

    let value = parsed.map_err(|e| SubmitError::Decode(e.to_string()))?;
    if !value.is_object() {
        return Err(SubmitError::Decode("response is not a JSON object".to_string()));
    }

    let result = OcrResult::from_value(value).map_err(|e| SubmitError::Decode(e.to_string()))?;
    if !result.response().success {
        let message = error_field(result.raw()).unwrap_or_else(|| UNKNOWN_FALLBACK.to_string());
        return Err(SubmitError::Rejected(message));
    }

    Ok(result)
}

fn error_field(value: &Value) -> Option<String> {
    value
        .get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
