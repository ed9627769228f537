//! Session state owned by the UI thread
//!
//! Staged uploads, the request lifecycle and the current notification. All
//! transitions go through methods here so the one-request-in-flight rule and
//! stale-completion filtering hold no matter which view triggers them.

use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::{OcrResult, SubmitError};
use crate::upload::{StageReport, StagedFile, SubmitKind, SubmitRequest, UploadQueue};

/// Shown when a request succeeds
pub const SUCCESS_MESSAGE: &str = "OCR processing completed successfully!";

/// Where the current request stands
#[derive(Debug, Clone, Default)]
pub enum RequestLifecycle {
    /// Nothing sent yet, or the last request was cancelled or dismissed
    #[default]
    Idle,
    /// A request is in flight
    Submitting {
        id: Uuid,
        kind: SubmitKind,
        file_count: usize,
        started: Instant,
    },
    /// The last request produced a result
    Succeeded(Box<OcrResult>),
    /// The last request failed
    Failed(SubmitError),
}

/// Handed to the worker when a submission is accepted
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub id: Uuid,
    pub request: SubmitRequest,
}

/// Notification severity, mapped to a colour by the theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// Transient message shown as a toast
#[derive(Debug, Clone)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub created: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created) >= ttl
    }
}

/// Everything the user has done so far in this session
#[derive(Debug, Default)]
pub struct SessionState {
    uploads: UploadQueue,
    request: RequestLifecycle,
    notification: Option<Notification>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> &UploadQueue {
        &self.uploads
    }

    pub fn request(&self) -> &RequestLifecycle {
        &self.request
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.request, RequestLifecycle::Submitting { .. })
    }

    /// Id of the in-flight request
    pub fn in_flight(&self) -> Option<Uuid> {
        match self.request {
            RequestLifecycle::Submitting { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Stage files from disk
    pub fn stage_paths(&mut self, paths: &[PathBuf]) -> Result<StageReport, SubmitError> {
        self.ensure_idle()?;
        let report = self.uploads.stage_paths(paths);
        self.report_skipped(&report);
        Ok(report)
    }

    /// Stage files that arrived as bytes
    pub fn stage_files(&mut self, files: Vec<StagedFile>) -> Result<StageReport, SubmitError> {
        self.ensure_idle()?;
        let report = self.uploads.stage_files(files);
        self.report_skipped(&report);
        Ok(report)
    }

    pub fn remove_file(&mut self, index: usize) -> Result<Option<StagedFile>, SubmitError> {
        self.ensure_idle()?;
        Ok(self.uploads.remove(index))
    }

    /// Empty the upload list and discard the current result or error
    pub fn clear(&mut self) -> Result<(), SubmitError> {
        self.ensure_idle()?;
        self.uploads.clear();
        self.request = RequestLifecycle::Idle;
        info!("Cleared staged files and result");
        Ok(())
    }

    /// Start a request for the staged files.
    ///
    /// Fails without side effects on the lifecycle when a request is already
    /// in flight or nothing is staged.
    pub fn submit(&mut self) -> Result<SubmitTicket, SubmitError> {
        if self.is_busy() {
            warn!("Submit ignored: a request is already in progress");
            return Err(SubmitError::Busy);
        }

        let Some(request) = self.uploads.submission() else {
            let err = SubmitError::NoFiles;
            self.notify(Severity::Error, err.to_string());
            return Err(err);
        };

        let id = Uuid::new_v4();
        info!(
            "Submitting {} file(s) as {:?} request {}",
            request.file_count(),
            request.kind(),
            id
        );
        self.request = RequestLifecycle::Submitting {
            id,
            kind: request.kind(),
            file_count: request.file_count(),
            started: Instant::now(),
        };

        Ok(SubmitTicket { id, request })
    }

    /// Apply a finished request. Returns false when `id` is not the request in
    /// flight, in which case nothing changes.
    pub fn complete(&mut self, id: Uuid, outcome: Result<OcrResult, SubmitError>) -> bool {
        let started = match self.request {
            RequestLifecycle::Submitting {
                id: current,
                started,
                ..
            } if current == id => started,
            _ => {
                debug!("Ignoring completion of stale request {}", id);
                return false;
            }
        };

        match outcome {
            Ok(result) => {
                info!(
                    "Request {} succeeded in {:.1}s ({} words)",
                    id,
                    started.elapsed().as_secs_f32(),
                    result.word_count()
                );
                self.request = RequestLifecycle::Succeeded(Box::new(result));
                self.notify(Severity::Success, SUCCESS_MESSAGE);
            }
            Err(err) => {
                warn!("Request {} failed: {:?}", id, err);
                self.notify(Severity::Error, err.to_string());
                self.request = RequestLifecycle::Failed(err);
            }
        }
        true
    }

    /// Abandon the in-flight request, returning its id
    pub fn cancel(&mut self) -> Option<Uuid> {
        let id = self.in_flight()?;
        info!("Cancelled request {}", id);
        self.request = RequestLifecycle::Idle;
        self.notify(Severity::Info, SubmitError::Cancelled.to_string());
        Some(id)
    }

    /// Drop a failed state back to idle
    pub fn dismiss_error(&mut self) {
        if matches!(self.request, RequestLifecycle::Failed(_)) {
            self.request = RequestLifecycle::Idle;
        }
    }

    pub fn result(&self) -> Option<&OcrResult> {
        match &self.request {
            RequestLifecycle::Succeeded(result) => Some(result.as_ref()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SubmitError> {
        match &self.request {
            RequestLifecycle::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Replace the current notification
    pub fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        self.notification = Some(Notification {
            severity,
            message: message.into(),
            created: Instant::now(),
        });
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Drop the notification once it is older than `ttl`
    pub fn expire_notification(&mut self, now: Instant, ttl: Duration) {
        if self
            .notification
            .as_ref()
            .map(|n| n.is_expired(now, ttl))
            .unwrap_or(false)
        {
            self.notification = None;
        }
    }

    fn ensure_idle(&self) -> Result<(), SubmitError> {
        if self.is_busy() {
            Err(SubmitError::Busy)
        } else {
            Ok(())
        }
    }

    fn report_skipped(&mut self, report: &StageReport) {
        if report.rejected.is_empty() {
            return;
        }
        let names = report
            .rejected
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        self.notify(
            Severity::Warning,
            format!(
                "Skipped {} file(s) that are not supported images: {}",
                report.rejected.len(),
                names
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn staged(name: &str) -> StagedFile {
        StagedFile::from_bytes(name, vec![0u8; 16])
    }

    fn session_with(names: &[&str]) -> SessionState {
        let mut session = SessionState::new();
        session
            .stage_files(names.iter().map(|n| staged(n)).collect())
            .unwrap();
        session
    }

    fn result(text: &str) -> OcrResult {
        OcrResult::from_value(json!({"success": true, "text": text, "word_count": 2})).unwrap()
    }

    #[test]
    fn test_submit_without_files_issues_nothing() {
        let mut session = SessionState::new();
        assert_eq!(session.submit().unwrap_err(), SubmitError::NoFiles);
        assert!(!session.is_busy());
        let note = session.notification().unwrap();
        assert_eq!(note.severity, Severity::Error);
        assert_eq!(note.message, "Please select an image file");
    }

    #[test]
    fn test_submit_kind_from_staged_count() {
        let mut session = session_with(&["a.png"]);
        let ticket = session.submit().unwrap();
        assert!(matches!(ticket.request, SubmitRequest::Single(_)));

        let mut session = session_with(&["a.png", "b.png", "c.png"]);
        let ticket = session.submit().unwrap();
        assert_eq!(ticket.request.kind(), SubmitKind::Batch);
        assert_eq!(ticket.request.file_count(), 3);
    }

    #[test]
    fn test_second_submit_while_in_flight_is_rejected() {
        let mut session = session_with(&["a.png"]);
        let first = session.submit().unwrap();
        assert_eq!(session.submit().unwrap_err(), SubmitError::Busy);
        assert_eq!(session.in_flight(), Some(first.id));
    }

    #[test]
    fn test_staging_is_rejected_while_in_flight() {
        let mut session = session_with(&["a.png", "b.png"]);
        session.submit().unwrap();

        assert_eq!(
            session.stage_files(vec![staged("c.png")]).unwrap_err(),
            SubmitError::Busy
        );
        assert_eq!(session.remove_file(0).unwrap_err(), SubmitError::Busy);
        assert_eq!(session.clear().unwrap_err(), SubmitError::Busy);
        assert_eq!(session.uploads().len(), 2);
    }

    #[test]
    fn test_completion_success() {
        let mut session = session_with(&["a.png"]);
        let ticket = session.submit().unwrap();

        assert!(session.complete(ticket.id, Ok(result("Hello world"))));
        assert_eq!(session.result().unwrap().text(), "Hello world");
        assert!(!session.is_busy());
        let note = session.notification().unwrap();
        assert_eq!(note.severity, Severity::Success);
        assert_eq!(note.message, SUCCESS_MESSAGE);
    }

    #[test]
    fn test_completion_failure_surfaces_message() {
        let mut session = session_with(&["a.png"]);
        let ticket = session.submit().unwrap();
        let err = SubmitError::Server {
            status: 500,
            message: "bad image".to_string(),
        };

        assert!(session.complete(ticket.id, Err(err.clone())));
        assert_eq!(session.error(), Some(&err));
        assert_eq!(session.notification().unwrap().message, "bad image");

        session.dismiss_error();
        assert!(session.error().is_none());
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut session = session_with(&["a.png"]);
        let stale = session.submit().unwrap();
        assert_eq!(session.cancel(), Some(stale.id));

        let current = session.submit().unwrap();
        assert!(!session.complete(stale.id, Ok(result("old"))));
        assert_eq!(session.in_flight(), Some(current.id));

        assert!(session.complete(current.id, Ok(result("new"))));
        assert_eq!(session.result().unwrap().text(), "new");
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut session = session_with(&["a.png"]);
        assert!(session.cancel().is_none());

        session.submit().unwrap();
        assert!(session.cancel().is_some());
        assert!(matches!(session.request(), RequestLifecycle::Idle));
        assert_eq!(session.notification().unwrap().message, "Request cancelled");
    }

    #[test]
    fn test_clear_discards_result() {
        let mut session = session_with(&["a.png"]);
        let ticket = session.submit().unwrap();
        session.complete(ticket.id, Ok(result("text")));

        session.clear().unwrap();
        assert!(session.result().is_none());
        assert!(session.uploads().is_empty());
    }

    #[test]
    fn test_skipped_files_warning() {
        let mut session = SessionState::new();
        let report = session
            .stage_files(vec![staged("a.png"), staged("notes.txt")])
            .unwrap();
        assert_eq!(report.staged, 1);
        let note = session.notification().unwrap();
        assert_eq!(note.severity, Severity::Warning);
        assert!(note.message.starts_with("Skipped 1 file(s)"));
        assert!(note.message.contains("notes.txt"));
    }

    #[test]
    fn test_notification_expiry() {
        let mut session = SessionState::new();
        session.notify(Severity::Info, "hello");
        let created = session.notification().unwrap().created;

        session.expire_notification(created + Duration::from_secs(5), Duration::from_secs(6));
        assert!(session.notification().is_some());

        session.expire_notification(created + Duration::from_secs(6), Duration::from_secs(6));
        assert!(session.notification().is_none());
    }

    #[test]
    fn test_newer_notification_replaces_older() {
        let mut session = SessionState::new();
        session.notify(Severity::Info, "first");
        session.notify(Severity::Error, "second");
        assert_eq!(session.notification().unwrap().message, "second");
    }
}
