//! Background worker
//!
//! Owns the tokio runtime and the OCR service. The dashboard sends
//! [`WorkerCommand`]s over a channel and receives [`WorkerEvent`]s back; the
//! UI thread never waits on the network.

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::api::{OcrResult, OcrService, SubmitError};
use crate::shared::{SubmitTicket, WorkerCommand, WorkerEvent};
use crate::upload::SubmitRequest;

/// Called after each event so the UI can wake up and drain the channel
pub type RepaintCallback = Arc<dyn Fn() + Send + Sync>;

/// Cancellation tokens of requests still running
#[derive(Default)]
struct InFlight {
    tokens: Mutex<HashMap<Uuid, CancellationToken>>,
}

impl InFlight {
    fn register(&self, id: Uuid) -> CancellationToken {
        let token = CancellationToken::new();
        self.tokens.lock().insert(id, token.clone());
        token
    }

    fn finish(&self, id: Uuid) {
        self.tokens.lock().remove(&id);
    }

    fn cancel(&self, id: Uuid) -> bool {
        match self.tokens.lock().remove(&id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn cancel_all(&self) {
        for (_, token) in self.tokens.lock().drain() {
            token.cancel();
        }
    }
}

/// Handle to the worker thread
pub struct OcrWorker {
    commands: Sender<WorkerCommand>,
    events: Receiver<WorkerEvent>,
    handle: Option<JoinHandle<()>>,
}

impl OcrWorker {
    /// Start the worker thread with its own multi-threaded runtime
    pub fn spawn(service: Arc<dyn OcrService>, repaint: RepaintCallback) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("ocr-worker-rt")
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")?;

        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        let handle = std::thread::Builder::new()
            .name("ocr-worker".to_string())
            .spawn(move || {
                info!("Worker thread starting...");
                run_loop(runtime, service, command_rx, event_tx, repaint);
                info!("Worker thread exiting...");
            })
            .context("Failed to spawn worker thread")?;

        Ok(Self {
            commands: command_tx,
            events: event_rx,
            handle: Some(handle),
        })
    }

    pub fn send(&self, command: WorkerCommand) {
        if self.commands.send(command).is_err() {
            error!("Worker thread is gone; command dropped");
        }
    }

    pub fn submit(&self, ticket: SubmitTicket) {
        self.send(WorkerCommand::Submit(ticket));
    }

    pub fn cancel(&self, id: Uuid) {
        self.send(WorkerCommand::Cancel(id));
    }

    pub fn check_health(&self) {
        self.send(WorkerCommand::CheckHealth);
    }

    pub fn fetch_image(&self, request: Uuid, location: impl Into<String>) {
        self.send(WorkerCommand::FetchImage {
            request,
            location: location.into(),
        });
    }

    /// Events that arrived since the last call
    pub fn drain_events(&self) -> Vec<WorkerEvent> {
        self.events.try_iter().collect()
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for OcrWorker {
    fn drop(&mut self) {
        // Signal worker to stop
        let _ = self.commands.send(WorkerCommand::Shutdown);

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_loop(
    runtime: Runtime,
    service: Arc<dyn OcrService>,
    commands: Receiver<WorkerCommand>,
    events: Sender<WorkerEvent>,
    repaint: RepaintCallback,
) {
    let in_flight = Arc::new(InFlight::default());

    while let Ok(command) = commands.recv() {
        match command {
            WorkerCommand::Submit(SubmitTicket { id, request }) => {
                let token = in_flight.register(id);
                let service = service.clone();
                let events = events.clone();
                let repaint = repaint.clone();
                let in_flight = in_flight.clone();

                runtime.spawn(async move {
                    let outcome = tokio::select! {
                        _ = token.cancelled() => Err(SubmitError::Cancelled),
                        outcome = dispatch(service.as_ref(), &request) => outcome,
                    };
                    in_flight.finish(id);

                    debug!("Request {} finished: ok={}", id, outcome.is_ok());
                    let _ = events.send(WorkerEvent::Completed { id, outcome });
                    repaint();
                });
            }
            WorkerCommand::Cancel(id) => {
                if !in_flight.cancel(id) {
                    debug!("Cancel for unknown request {}", id);
                }
            }
            WorkerCommand::CheckHealth => {
                let service = service.clone();
                let events = events.clone();
                let repaint = repaint.clone();
                runtime.spawn(async move {
                    let outcome = service.health().await;
                    let _ = events.send(WorkerEvent::Health(outcome));
                    repaint();
                });
            }
            WorkerCommand::FetchImage { request, location } => {
                let service = service.clone();
                let events = events.clone();
                let repaint = repaint.clone();
                runtime.spawn(async move {
                    let outcome = service.fetch_image(&location).await;
                    let _ = events.send(WorkerEvent::ImageFetched {
                        request,
                        location,
                        outcome,
                    });
                    repaint();
                });
            }
            WorkerCommand::Shutdown => break,
        }
    }

    in_flight.cancel_all();
    runtime.shutdown_background();
}

async fn dispatch(
    service: &dyn OcrService,
    request: &SubmitRequest,
) -> Result<OcrResult, SubmitError> {
    match request {
        SubmitRequest::Single(file) => service.recognize(file).await,
        SubmitRequest::Batch(files) => service.recognize_batch(files).await,
    }
}
